//! Fixed defaults for the quoted pair and the price API

/// 0x API base URL (mainnet)
pub const DEFAULT_BASE_URL: &str = "https://api.0x.org";

/// Path of the price endpoint, relative to the base URL
pub const PRICE_PATH: &str = "/swap/v1/price";

/// Taker wallet used for indicative pricing
pub const DEFAULT_TAKER: &str = "0x4918fc71BD92F262c4D2F73804fa805de8602743";

/// WETH on Ethereum mainnet
pub const WETH_MAINNET: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

/// DAI on Ethereum mainnet
pub const DAI_MAINNET: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";

/// Shared by WETH and DAI
pub const DEFAULT_DECIMALS: u32 = 18;

pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Header carrying the 0x API key
pub const API_KEY_HEADER: &str = "0x-api-key";
