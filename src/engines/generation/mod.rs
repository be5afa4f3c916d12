pub mod ast;
pub mod decoder;
pub mod gene_consumer;
pub mod linker;

pub use ast::{AstNode, ExpressionTree, NodeId};
pub use decoder::{decode, GeneDecoder};
pub use gene_consumer::GeneConsumer;
pub use linker::link;
