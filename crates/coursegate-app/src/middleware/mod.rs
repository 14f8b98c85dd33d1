pub mod directory_guard;
pub mod session_gate;
