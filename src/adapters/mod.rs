pub mod fetch;
pub mod gnn;
pub mod http;
pub mod onnx;
