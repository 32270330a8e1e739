pub mod extract;
pub mod html;
pub mod text;
pub mod tree;

#[cfg(test)]
mod tests;

pub use tree::TreeNode;
