pub mod exec_trace;
pub mod flow_classify;

// Re-export all probes for convenience
pub use exec_trace::ExecTraceProbe;
pub use flow_classify::FlowClassifyProbe;
