pub mod access;

pub use access::{
    access_control_middleware, AccessControlChain, Decision, Denial, Gate, GateContext,
    MethodGate, PolicyTable, PublicBypassGate, RoleGate, RoutePolicy,
};
