//! Copy-trading account hierarchy: relationship index, role classification,
//! and master/copier grouping.

mod builder;
mod classifier;
mod index;

pub use builder::{AccountHierarchyBuilder, HierarchyNode};
pub use classifier::{AccountRole, AccountRoleClassifier};
pub use index::CopyRelationshipIndex;

