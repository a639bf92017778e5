//! Kernel side of tracemark: two bounded callbacks that stamp a fixed
//! marker line into the trace ring and return control to the kernel.
//!
//! Neither program inspects its context argument; the hook-specific layout
//! is opaque and nothing here depends on it. There are no maps and no state
//! shared between invocations, so concurrent triggers on different CPUs are
//! independent by construction.

#![no_std]
#![no_main]

use aya_ebpf::{
    helpers::bpf_trace_printk,
    macros::{kprobe, tracepoint},
    programs::{ProbeContext, TracePointContext},
};
use tracemark_common::{EXEC_TRACE_MESSAGE, FLOW_CLASSIFY_MESSAGE};

#[unsafe(link_section = "license")]
#[used]
pub static LICENSE: [u8; 4] = tracemark_common::LICENSE;

#[unsafe(link_section = "version")]
#[used]
pub static VERSION: u32 = tracemark_common::PROGRAM_VERSION;

#[tracepoint]
pub fn exec_trace(_ctx: TracePointContext) -> u32 {
    emit(EXEC_TRACE_MESSAGE)
}

#[kprobe]
pub fn flow_classify(_ctx: ProbeContext) -> u32 {
    emit(FLOW_CLASSIFY_MESSAGE)
}

/// Appends one line to the trace ring. The buffer length includes the NUL
/// terminator, matching what `bpf_trace_printk` expects; the helper's return
/// value carries no signal here.
#[inline(always)]
fn emit(message: &'static [u8]) -> u32 {
    unsafe {
        bpf_trace_printk(message.as_ptr() as *const _, message.len() as u32);
    }
    0
}

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
