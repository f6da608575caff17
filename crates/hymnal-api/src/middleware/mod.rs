pub mod method_gate;
pub mod request_id;

pub use method_gate::method_gate_middleware;
pub use request_id::request_id_middleware;
