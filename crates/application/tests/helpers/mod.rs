pub mod mocks;

pub use mocks::{
    ManualClock, MockClientRegistry, MockReply, MockUnitStore, MockUpstreamExecutor,
};
