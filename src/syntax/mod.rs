//! Filter tree model
//!
//! The tree is owned top-down: branches own their children by value and
//! nothing points back up. Every query that needs context (validity,
//! cursor mapping) walks down from the root instead.
//!
//! ```text
//! FilterTree
//!   ├── Undefined        (text before the first '(')
//!   ├── FilterNode       (root)
//!   │     └── Branch → FilterNode*  | Item | Extensible | Undefined
//!   └── Undefined        (text after the root)
//! ```

mod node;
mod slot;
mod tree;
mod validity;

pub use node::{
    Branch, BranchOperator, Extensible, FilterNode, FilterType, Item, NodeKind, Undefined,
};
pub use slot::{ChildError, Slot, SlotError};
pub use tree::FilterTree;
pub use validity::InvalidCause;
