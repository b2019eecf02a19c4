use crate::error::{Error, Result};

/// Implements the numeric protocol tag conversions for a `#[repr(u8)]` enum.
macro_rules! protocol_tag {
    ($name:ident, $field:literal, { $($variant:ident = $tag:literal),+ $(,)? }) => {
        impl $name {
            /// Numeric tag used by the exchange contract
            pub fn as_u8(&self) -> u8 {
                *self as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(tag: u8) -> Result<Self> {
                match tag {
                    $($tag => Ok($name::$variant),)+
                    other => Err(Error::malformed($field, format!("unknown tag {}", other))),
                }
            }
        }
    };
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

protocol_tag!(Side, "side", { Buy = 0, Sell = 1 });

/// How the price of an order evolves over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SaleKind {
    /// Price is the base price for the whole life of the order
    FixedPrice = 0,
    /// Price moves linearly by `extra` between listing and expiration
    DutchAuction = 1,
}

protocol_tag!(SaleKind, "saleKind", { FixedPrice = 0, DutchAuction = 1 });

/// How relayer fees are paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FeeMethod {
    ProtocolFee = 0,
    SplitFee = 1,
}

protocol_tag!(FeeMethod, "feeMethod", { ProtocolFee = 0, SplitFee = 1 });

/// How the exchange proxy calls the order target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HowToCall {
    Call = 0,
    DelegateCall = 1,
}

protocol_tag!(HowToCall, "howToCall", { Call = 0, DelegateCall = 1 });

/// Asset schemas an order's metadata may refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WyvernSchemaName {
    Erc20,
    Erc721,
    Erc1155,
    LegacyEnjin,
    EnsShortNameAuction,
    CryptoPunks,
}

impl WyvernSchemaName {
    pub fn as_str(&self) -> &'static str {
        match self {
            WyvernSchemaName::Erc20 => "ERC20",
            WyvernSchemaName::Erc721 => "ERC721",
            WyvernSchemaName::Erc1155 => "ERC1155",
            WyvernSchemaName::LegacyEnjin => "Enjin",
            WyvernSchemaName::EnsShortNameAuction => "ENSShortNameAuction",
            WyvernSchemaName::CryptoPunks => "CryptoPunks",
        }
    }

    /// Whether assets of this schema are fungible (no token id)
    pub fn is_fungible(&self) -> bool {
        matches!(self, WyvernSchemaName::Erc20)
    }
}

impl std::str::FromStr for WyvernSchemaName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ERC20" => Ok(WyvernSchemaName::Erc20),
            "ERC721" => Ok(WyvernSchemaName::Erc721),
            "ERC1155" => Ok(WyvernSchemaName::Erc1155),
            "Enjin" => Ok(WyvernSchemaName::LegacyEnjin),
            "ENSShortNameAuction" => Ok(WyvernSchemaName::EnsShortNameAuction),
            "CryptoPunks" => Ok(WyvernSchemaName::CryptoPunks),
            other => Err(Error::malformed(
                "metadata.schema",
                format!("unknown schema {:?}", other),
            )),
        }
    }
}
