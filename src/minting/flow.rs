// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client-side mint orchestration as a state machine.
//!
//! ```text
//! Disconnected → WalletConnected → SignedIn → ImageReady → VoucherRequested → Minted
//! ```
//!
//! A client feeds user actions and server responses into [`MintFlow::apply`].
//! Guards that fail produce a [`FlowAlert`] for the user and leave the flow
//! unchanged. Successful actions may ask the client to do something next
//! ([`Effect`]): send the voucher request, or redeem the voucher on-chain.

use std::fmt;

use crate::models::{MintVoucherRequest, SessionUser, SignedPayload};

/// The connected wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub address: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MintStage {
    Disconnected,
    WalletConnected,
    SignedIn,
    ImageReady,
    VoucherRequested,
    Minted,
}

impl fmt::Display for MintStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MintStage::Disconnected => "disconnected",
            MintStage::WalletConnected => "wallet-connected",
            MintStage::SignedIn => "signed-in",
            MintStage::ImageReady => "image-ready",
            MintStage::VoucherRequested => "voucher-requested",
            MintStage::Minted => "minted",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub enum MintAction {
    ConnectWallet(WalletAccount),
    SignIn(SessionUser),
    /// Artwork uploaded; carries its URI.
    ImageReady(String),
    RequestVoucher,
    VoucherIssued(SignedPayload),
    /// Server refused or failed; carries the error message.
    VoucherRejected(String),
    /// Voucher redeemed; carries the token ID.
    Minted(String),
    Disconnect,
    SignOut,
}

/// What the client should do after a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// POST this body to `/api/server`.
    SendVoucherRequest(MintVoucherRequest),
    /// Call the collection's signature mint with this voucher.
    Redeem(SignedPayload),
}

/// User-facing guard failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowAlert {
    #[error("Wrong network: switch your wallet to chain {expected} (currently on {actual})")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Please sign in with an account that has a name and a profile image")]
    MissingProfile,

    #[error("Please choose or generate an image first")]
    MissingImage,

    #[error("Not ready yet (currently {0})")]
    NotReady(MintStage),

    #[error("A mint is already in progress")]
    MintInProgress,
}

/// Mint flow for one browser session.
#[derive(Debug, Clone)]
pub struct MintFlow {
    target_chain_id: u64,
    wallet: Option<WalletAccount>,
    user: Option<SessionUser>,
    image: Option<String>,
    in_flight: bool,
    voucher: Option<SignedPayload>,
    token_id: Option<String>,
}

impl MintFlow {
    pub fn new(target_chain_id: u64) -> Self {
        Self {
            target_chain_id,
            wallet: None,
            user: None,
            image: None,
            in_flight: false,
            voucher: None,
            token_id: None,
        }
    }

    pub fn stage(&self) -> MintStage {
        if self.token_id.is_some() {
            MintStage::Minted
        } else if self.in_flight || self.voucher.is_some() {
            MintStage::VoucherRequested
        } else if self.wallet.is_none() {
            MintStage::Disconnected
        } else if self.user.is_none() {
            MintStage::WalletConnected
        } else if self.image.is_none() {
            MintStage::SignedIn
        } else {
            MintStage::ImageReady
        }
    }

    pub fn wallet(&self) -> Option<&WalletAccount> {
        self.wallet.as_ref()
    }

    pub fn token_id(&self) -> Option<&str> {
        self.token_id.as_deref()
    }

    fn require(&self, at_least: MintStage) -> Result<(), FlowAlert> {
        let stage = self.stage();
        if stage == MintStage::VoucherRequested && self.in_flight {
            return Err(FlowAlert::MintInProgress);
        }
        if stage < at_least || stage >= MintStage::VoucherRequested {
            return Err(FlowAlert::NotReady(stage));
        }
        Ok(())
    }

    /// Apply `action`. On error the flow is unchanged.
    pub fn apply(&mut self, action: MintAction) -> Result<Effect, FlowAlert> {
        match action {
            MintAction::ConnectWallet(account) => {
                if self.in_flight {
                    return Err(FlowAlert::MintInProgress);
                }
                if account.chain_id != self.target_chain_id {
                    return Err(FlowAlert::WrongNetwork {
                        expected: self.target_chain_id,
                        actual: account.chain_id,
                    });
                }
                self.wallet = Some(account);
                self.voucher = None;
                self.token_id = None;
                Ok(Effect::None)
            }
            MintAction::SignIn(user) => {
                self.require(MintStage::WalletConnected)?;
                if user.name.trim().is_empty() || user.image.trim().is_empty() {
                    return Err(FlowAlert::MissingProfile);
                }
                self.user = Some(user);
                Ok(Effect::None)
            }
            MintAction::ImageReady(uri) => {
                self.require(MintStage::SignedIn)?;
                if uri.trim().is_empty() {
                    return Err(FlowAlert::MissingImage);
                }
                self.image = Some(uri);
                Ok(Effect::None)
            }
            MintAction::RequestVoucher => {
                self.require(MintStage::ImageReady)?;
                let (Some(wallet), Some(user), Some(image)) = (&self.wallet, &self.user, &self.image)
                else {
                    return Err(FlowAlert::NotReady(self.stage()));
                };
                let request = MintVoucherRequest {
                    author_address: wallet.address.clone(),
                    nft_name: user.name.clone(),
                    image_path: image.clone(),
                };
                self.in_flight = true;
                Ok(Effect::SendVoucherRequest(request))
            }
            MintAction::VoucherIssued(voucher) => {
                if !self.in_flight {
                    return Err(FlowAlert::NotReady(self.stage()));
                }
                self.in_flight = false;
                self.voucher = Some(voucher.clone());
                Ok(Effect::Redeem(voucher))
            }
            MintAction::VoucherRejected(_) => {
                if !self.in_flight {
                    return Err(FlowAlert::NotReady(self.stage()));
                }
                self.in_flight = false;
                Ok(Effect::None)
            }
            MintAction::Minted(token_id) => {
                if self.voucher.is_none() || self.token_id.is_some() {
                    return Err(FlowAlert::NotReady(self.stage()));
                }
                self.token_id = Some(token_id);
                Ok(Effect::None)
            }
            MintAction::Disconnect => {
                self.wallet = None;
                self.in_flight = false;
                self.voucher = None;
                self.token_id = None;
                Ok(Effect::None)
            }
            MintAction::SignOut => {
                self.user = None;
                self.image = None;
                self.in_flight = false;
                self.voucher = None;
                self.token_id = None;
                Ok(Effect::None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minting::{NftMetadata, NftProperties};
    use crate::models::VoucherPayload;

    const MUMBAI: u64 = 80001;

    fn wallet(chain_id: u64) -> WalletAccount {
        WalletAccount {
            address: "0xAbC0000000000000000000000000000000000001".to_string(),
            chain_id,
        }
    }

    fn alice() -> SessionUser {
        SessionUser {
            name: "Alice".to_string(),
            image: "https://pbs.twimg.com/alice.jpg".to_string(),
        }
    }

    fn voucher() -> SignedPayload {
        SignedPayload {
            payload: VoucherPayload {
                to: wallet(MUMBAI).address,
                metadata: NftMetadata {
                    name: "Alice".to_string(),
                    image: "ipfs://QmImage".to_string(),
                    description: "bio".to_string(),
                    properties: NftProperties {
                        username: "alice".to_string(),
                        link: "https://t.co/alice".to_string(),
                    },
                },
                uri: "ipfs://QmMeta".to_string(),
                price: "0".to_string(),
                currency_address: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".to_string(),
                mint_start_time: 0,
                mint_end_time: 3600,
                uid: format!("0x{}", "00".repeat(32)),
                royalty_recipient: format!("0x{}", "00".repeat(20)),
                royalty_bps: 0,
                primary_sale_recipient: format!("0x{}", "00".repeat(20)),
            },
            signature: format!("0x{}", "11".repeat(65)),
        }
    }

    fn ready_flow() -> MintFlow {
        let mut flow = MintFlow::new(MUMBAI);
        flow.apply(MintAction::ConnectWallet(wallet(MUMBAI))).unwrap();
        flow.apply(MintAction::SignIn(alice())).unwrap();
        flow.apply(MintAction::ImageReady("ipfs://QmImage".to_string()))
            .unwrap();
        flow
    }

    #[test]
    fn happy_path_reaches_minted() {
        let mut flow = ready_flow();
        assert_eq!(flow.stage(), MintStage::ImageReady);

        let effect = flow.apply(MintAction::RequestVoucher).unwrap();
        assert_eq!(
            effect,
            Effect::SendVoucherRequest(MintVoucherRequest {
                author_address: "0xAbC0000000000000000000000000000000000001".to_string(),
                nft_name: "Alice".to_string(),
                image_path: "ipfs://QmImage".to_string(),
            })
        );
        assert_eq!(flow.stage(), MintStage::VoucherRequested);

        let effect = flow.apply(MintAction::VoucherIssued(voucher())).unwrap();
        assert_eq!(effect, Effect::Redeem(voucher()));

        flow.apply(MintAction::Minted("7".to_string())).unwrap();
        assert_eq!(flow.stage(), MintStage::Minted);
        assert_eq!(flow.token_id(), Some("7"));
    }

    #[test]
    fn wrong_network_is_refused() {
        let mut flow = MintFlow::new(MUMBAI);
        let alert = flow.apply(MintAction::ConnectWallet(wallet(137))).unwrap_err();
        assert_eq!(
            alert,
            FlowAlert::WrongNetwork {
                expected: MUMBAI,
                actual: 137
            }
        );
        assert_eq!(flow.stage(), MintStage::Disconnected);
    }

    #[test]
    fn profile_without_image_is_refused() {
        let mut flow = MintFlow::new(MUMBAI);
        flow.apply(MintAction::ConnectWallet(wallet(MUMBAI))).unwrap();

        let mut user = alice();
        user.image.clear();
        assert_eq!(
            flow.apply(MintAction::SignIn(user)).unwrap_err(),
            FlowAlert::MissingProfile
        );
        assert_eq!(flow.stage(), MintStage::WalletConnected);
    }

    #[test]
    fn empty_image_is_refused() {
        let mut flow = MintFlow::new(MUMBAI);
        flow.apply(MintAction::ConnectWallet(wallet(MUMBAI))).unwrap();
        flow.apply(MintAction::SignIn(alice())).unwrap();

        assert_eq!(
            flow.apply(MintAction::ImageReady(" ".to_string())).unwrap_err(),
            FlowAlert::MissingImage
        );
    }

    #[test]
    fn out_of_order_actions_report_stage() {
        let mut flow = MintFlow::new(MUMBAI);
        assert_eq!(
            flow.apply(MintAction::SignIn(alice())).unwrap_err(),
            FlowAlert::NotReady(MintStage::Disconnected)
        );
        assert_eq!(
            flow.apply(MintAction::RequestVoucher).unwrap_err(),
            FlowAlert::NotReady(MintStage::Disconnected)
        );
        assert_eq!(
            flow.apply(MintAction::Minted("1".to_string())).unwrap_err(),
            FlowAlert::NotReady(MintStage::Disconnected)
        );
    }

    #[test]
    fn second_request_while_in_flight_is_refused() {
        let mut flow = ready_flow();
        flow.apply(MintAction::RequestVoucher).unwrap();

        assert_eq!(
            flow.apply(MintAction::RequestVoucher).unwrap_err(),
            FlowAlert::MintInProgress
        );
        assert_eq!(
            flow.apply(MintAction::ImageReady("ipfs://Other".to_string()))
                .unwrap_err(),
            FlowAlert::MintInProgress
        );
    }

    #[test]
    fn rejected_voucher_allows_retry() {
        let mut flow = ready_flow();
        flow.apply(MintAction::RequestVoucher).unwrap();
        flow.apply(MintAction::VoucherRejected("Already minted".to_string()))
            .unwrap();

        assert_eq!(flow.stage(), MintStage::ImageReady);
        assert!(flow.apply(MintAction::RequestVoucher).is_ok());
    }

    #[test]
    fn sign_out_and_disconnect_reset() {
        let mut flow = ready_flow();
        flow.apply(MintAction::SignOut).unwrap();
        assert_eq!(flow.stage(), MintStage::WalletConnected);

        flow.apply(MintAction::Disconnect).unwrap();
        assert_eq!(flow.stage(), MintStage::Disconnected);
        assert!(flow.wallet().is_none());
    }
}
