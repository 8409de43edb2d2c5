pub mod shutdown;

pub use shutdown::listen_for_shutdown;
