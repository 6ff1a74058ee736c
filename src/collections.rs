pub mod avl_map;

pub use avl_map::AvlMap;
