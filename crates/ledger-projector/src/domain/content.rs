//! # Proposal Content
//!
//! Proposal content travels as a packed `Any`. The family of content types is
//! closed; each one is decoded by type URL into a [`ProposalContent`]
//! variant, and anything else is rejected.

use prost::Message;
use serde::{Deserialize, Serialize};
use shared_types::{Any, Coin, Coins};

use super::errors::DecodeError;

/// Type URLs of the supported content types.
pub mod type_urls {
    pub const TEXT: &str = "/cosmos.gov.v1beta1.TextProposal";
    pub const PARAMETER_CHANGE: &str = "/cosmos.params.v1beta1.ParameterChangeProposal";
    pub const SOFTWARE_UPGRADE: &str = "/cosmos.upgrade.v1beta1.SoftwareUpgradeProposal";
    pub const CANCEL_SOFTWARE_UPGRADE: &str =
        "/cosmos.upgrade.v1beta1.CancelSoftwareUpgradeProposal";
    pub const COMMUNITY_POOL_SPEND: &str =
        "/cosmos.distribution.v1beta1.CommunityPoolSpendProposal";
}

/// Protobuf wire layout of the content types.
pub mod proto {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TextProposal {
        #[prost(string, tag = "1")]
        pub title: String,
        #[prost(string, tag = "2")]
        pub description: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ParamChange {
        #[prost(string, tag = "1")]
        pub subspace: String,
        #[prost(string, tag = "2")]
        pub key: String,
        #[prost(string, tag = "3")]
        pub value: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ParameterChangeProposal {
        #[prost(string, tag = "1")]
        pub title: String,
        #[prost(string, tag = "2")]
        pub description: String,
        #[prost(message, repeated, tag = "3")]
        pub changes: Vec<ParamChange>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Plan {
        #[prost(string, tag = "1")]
        pub name: String,
        #[prost(int64, tag = "3")]
        pub height: i64,
        #[prost(string, tag = "4")]
        pub info: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SoftwareUpgradeProposal {
        #[prost(string, tag = "1")]
        pub title: String,
        #[prost(string, tag = "2")]
        pub description: String,
        #[prost(message, optional, tag = "3")]
        pub plan: Option<Plan>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CancelSoftwareUpgradeProposal {
        #[prost(string, tag = "1")]
        pub title: String,
        #[prost(string, tag = "2")]
        pub description: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Coin {
        #[prost(string, tag = "1")]
        pub denom: String,
        #[prost(string, tag = "2")]
        pub amount: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CommunityPoolSpendProposal {
        #[prost(string, tag = "1")]
        pub title: String,
        #[prost(string, tag = "2")]
        pub description: String,
        #[prost(string, tag = "3")]
        pub recipient: String,
        #[prost(message, repeated, tag = "4")]
        pub amount: Vec<Coin>,
    }
}

/// A single parameter change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamChange {
    pub subspace: String,
    pub key: String,
    pub value: String,
}

/// The upgrade scheduled by a software upgrade proposal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradePlan {
    pub name: String,
    pub height: i64,
    pub info: String,
}

/// Decoded proposal content, tagged with its type URL when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum ProposalContent {
    #[serde(rename = "/cosmos.gov.v1beta1.TextProposal")]
    Text { title: String, description: String },

    #[serde(rename = "/cosmos.params.v1beta1.ParameterChangeProposal")]
    ParameterChange {
        title: String,
        description: String,
        changes: Vec<ParamChange>,
    },

    #[serde(rename = "/cosmos.upgrade.v1beta1.SoftwareUpgradeProposal")]
    SoftwareUpgrade {
        title: String,
        description: String,
        plan: UpgradePlan,
    },

    #[serde(rename = "/cosmos.upgrade.v1beta1.CancelSoftwareUpgradeProposal")]
    CancelSoftwareUpgrade { title: String, description: String },

    #[serde(rename = "/cosmos.distribution.v1beta1.CommunityPoolSpendProposal")]
    CommunityPoolSpend {
        title: String,
        description: String,
        /// Account address; target encoding once stored.
        recipient: String,
        amount: Coins,
    },
}

impl ProposalContent {
    /// Unpack content from its `Any` wrapper.
    pub fn decode(any: &Any) -> Result<Self, DecodeError> {
        match any.type_url.as_str() {
            type_urls::TEXT => {
                let msg: proto::TextProposal = unpack(any)?;
                Ok(Self::Text {
                    title: msg.title,
                    description: msg.description,
                })
            }
            type_urls::PARAMETER_CHANGE => {
                let msg: proto::ParameterChangeProposal = unpack(any)?;
                Ok(Self::ParameterChange {
                    title: msg.title,
                    description: msg.description,
                    changes: msg
                        .changes
                        .into_iter()
                        .map(|change| ParamChange {
                            subspace: change.subspace,
                            key: change.key,
                            value: change.value,
                        })
                        .collect(),
                })
            }
            type_urls::SOFTWARE_UPGRADE => {
                let msg: proto::SoftwareUpgradeProposal = unpack(any)?;
                let plan = msg.plan.unwrap_or_default();
                Ok(Self::SoftwareUpgrade {
                    title: msg.title,
                    description: msg.description,
                    plan: UpgradePlan {
                        name: plan.name,
                        height: plan.height,
                        info: plan.info,
                    },
                })
            }
            type_urls::CANCEL_SOFTWARE_UPGRADE => {
                let msg: proto::CancelSoftwareUpgradeProposal = unpack(any)?;
                Ok(Self::CancelSoftwareUpgrade {
                    title: msg.title,
                    description: msg.description,
                })
            }
            type_urls::COMMUNITY_POOL_SPEND => {
                let msg: proto::CommunityPoolSpendProposal = unpack(any)?;
                let amount = msg
                    .amount
                    .into_iter()
                    .map(|coin| -> Result<Coin, DecodeError> {
                        let amount = coin.amount.parse::<u128>().map_err(|_| DecodeError::InvalidAmount {
                            type_url: any.type_url.clone(),
                            amount: coin.amount.clone(),
                        })?;
                        Ok(Coin::new(amount, coin.denom))
                    })
                    .collect::<Result<Coins, _>>()?;
                Ok(Self::CommunityPoolSpend {
                    title: msg.title,
                    description: msg.description,
                    recipient: msg.recipient,
                    amount,
                })
            }
            other => Err(DecodeError::UnsupportedType {
                type_url: other.to_string(),
            }),
        }
    }

    /// Pack the content back into its `Any` wrapper.
    pub fn to_any(&self) -> Any {
        match self {
            Self::Text { title, description } => Any::new(
                type_urls::TEXT,
                proto::TextProposal {
                    title: title.clone(),
                    description: description.clone(),
                }
                .encode_to_vec(),
            ),
            Self::ParameterChange {
                title,
                description,
                changes,
            } => Any::new(
                type_urls::PARAMETER_CHANGE,
                proto::ParameterChangeProposal {
                    title: title.clone(),
                    description: description.clone(),
                    changes: changes
                        .iter()
                        .map(|change| proto::ParamChange {
                            subspace: change.subspace.clone(),
                            key: change.key.clone(),
                            value: change.value.clone(),
                        })
                        .collect(),
                }
                .encode_to_vec(),
            ),
            Self::SoftwareUpgrade {
                title,
                description,
                plan,
            } => Any::new(
                type_urls::SOFTWARE_UPGRADE,
                proto::SoftwareUpgradeProposal {
                    title: title.clone(),
                    description: description.clone(),
                    plan: Some(proto::Plan {
                        name: plan.name.clone(),
                        height: plan.height,
                        info: plan.info.clone(),
                    }),
                }
                .encode_to_vec(),
            ),
            Self::CancelSoftwareUpgrade { title, description } => Any::new(
                type_urls::CANCEL_SOFTWARE_UPGRADE,
                proto::CancelSoftwareUpgradeProposal {
                    title: title.clone(),
                    description: description.clone(),
                }
                .encode_to_vec(),
            ),
            Self::CommunityPoolSpend {
                title,
                description,
                recipient,
                amount,
            } => Any::new(
                type_urls::COMMUNITY_POOL_SPEND,
                proto::CommunityPoolSpendProposal {
                    title: title.clone(),
                    description: description.clone(),
                    recipient: recipient.clone(),
                    amount: amount
                        .iter()
                        .map(|coin| proto::Coin {
                            denom: coin.denom.clone(),
                            amount: coin.amount.to_string(),
                        })
                        .collect(),
                }
                .encode_to_vec(),
            ),
        }
    }

    /// Module that routes the proposal once it passes.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Text { .. } => "gov",
            Self::ParameterChange { .. } => "params",
            Self::SoftwareUpgrade { .. } | Self::CancelSoftwareUpgrade { .. } => "upgrade",
            Self::CommunityPoolSpend { .. } => "distribution",
        }
    }

    pub fn proposal_type(&self) -> &'static str {
        match self {
            Self::Text { .. } => "Text",
            Self::ParameterChange { .. } => "ParameterChange",
            Self::SoftwareUpgrade { .. } => "SoftwareUpgrade",
            Self::CancelSoftwareUpgrade { .. } => "CancelSoftwareUpgrade",
            Self::CommunityPoolSpend { .. } => "CommunityPoolSpend",
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Text { title, .. }
            | Self::ParameterChange { title, .. }
            | Self::SoftwareUpgrade { title, .. }
            | Self::CancelSoftwareUpgrade { title, .. }
            | Self::CommunityPoolSpend { title, .. } => title,
        }
    }

    /// Rewrite every address carried by the content.
    pub fn map_addresses<E>(
        self,
        convert: impl FnOnce(&str) -> Result<String, E>,
    ) -> Result<Self, E> {
        match self {
            Self::CommunityPoolSpend {
                title,
                description,
                recipient,
                amount,
            } => Ok(Self::CommunityPoolSpend {
                title,
                description,
                recipient: convert(&recipient)?,
                amount,
            }),
            other => Ok(other),
        }
    }
}

fn unpack<T: Message + Default>(any: &Any) -> Result<T, DecodeError> {
    T::decode(any.value.as_slice()).map_err(|source| DecodeError::Malformed {
        type_url: any.type_url.clone(),
        source,
    })
}
