//! Domain constants

use crate::types::Maturity;

/// Mask character used when a strategy does not specify one.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Maturity levels a subscription includes when it does not name any.
pub const DEFAULT_MATURITY_LEVELS: [Maturity; 2] = [Maturity::Stable, Maturity::Incubating];

/// Category names used by the built-in pattern catalog.
pub const CATEGORY_GLOBAL: &str = "global";
pub const CATEGORY_USA: &str = "usa";
pub const CATEGORY_KOREA: &str = "korea";
pub const CATEGORY_SECRETS: &str = "secrets";
