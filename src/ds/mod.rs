pub mod key_index;
pub mod node_pool;
pub mod recency_list;

pub use key_index::KeyIndex;
pub use node_pool::{NodeId, NodePool};
pub use recency_list::RecencyList;
