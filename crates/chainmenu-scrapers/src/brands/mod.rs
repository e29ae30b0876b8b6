//! One module per tracked chain. Each declares its `BrandProfile` (targets,
//! normalization rules, acceptance threshold) and the site-specific
//! extraction mechanics.

pub mod burgerking;
pub mod kfc;
pub mod lotteria;
pub mod mcdonalds;
pub mod momstouch;
pub mod nobrand;
pub mod popeyes;
