//! Marks every process execution in the kernel trace ring.

use anyhow::Result;
use tracemark_common::{EXEC_TRACE_HOOK, EXEC_TRACE_PROGRAM};

use crate::probes::{Probe, ProbeDescriptor};

/// Tracepoint on `syscalls:sys_enter_execve`. Each `execve` entry appends
/// one `hello!` line to the trace ring.
pub struct ExecTraceProbe;

impl Probe for ExecTraceProbe {
    fn descriptor(&self) -> Result<ProbeDescriptor> {
        ProbeDescriptor::parse(EXEC_TRACE_PROGRAM, EXEC_TRACE_HOOK)
    }
}
