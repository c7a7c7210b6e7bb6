mod upstream_executor;

pub use upstream_executor::UdpUpstreamExecutor;
