mod asset;
mod cash;
mod holdings;
mod position;

pub use asset::{Asset, AssetClass, AssetKind, Classification, STABLECOIN_SUBCATEGORY};
pub use cash::{BankAccount, Deposit};
pub use holdings::Holdings;
pub use position::Position;
