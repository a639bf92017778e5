//! Constants shared between the tracemark loader and its eBPF programs.
//!
//! Kernel and user space never exchange structured data here; the whole
//! contract is a handful of byte strings both sides must agree on bit-exactly.

#![no_std]

/// Marker emitted on every `execve` entry.
///
/// The trailing NUL terminates the buffer handed to `bpf_trace_printk`;
/// the visible trace line is everything before it, newline included.
pub const EXEC_TRACE_MESSAGE: &[u8] = b"hello!\n\0";

/// Marker emitted on every socket flow classification.
pub const FLOW_CLASSIFY_MESSAGE: &[u8] = b"{security_sk_classify_flow}\n\0";

/// Hook identifier for the execve tracepoint. Exact match required by the kernel.
pub const EXEC_TRACE_HOOK: &str = "tracepoint/syscalls/sys_enter_execve";

/// Hook identifier for the flow classification kprobe.
pub const FLOW_CLASSIFY_HOOK: &str = "kprobe/security_sk_classify_flow";

/// Program names in the compiled object, resolved by the loader.
pub const EXEC_TRACE_PROGRAM: &str = "exec_trace";
pub const FLOW_CLASSIFY_PROGRAM: &str = "flow_classify";

/// License footer consumed by the loader. GPL unlocks `bpf_trace_printk`.
pub const LICENSE: [u8; 4] = *b"GPL\0";

/// Version footer. The sentinel value is a loader convention, kept bit-exact.
pub const PROGRAM_VERSION: u32 = 0xFFFF_FFFE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_message_bytes() {
        assert_eq!(EXEC_TRACE_MESSAGE, b"hello!\n\0");
        assert_eq!(EXEC_TRACE_MESSAGE.len(), 8);
    }

    #[test]
    fn flow_classify_message_bytes() {
        assert_eq!(FLOW_CLASSIFY_MESSAGE, b"{security_sk_classify_flow}\n\0");
        assert_eq!(FLOW_CLASSIFY_MESSAGE.len(), 29);
    }

    #[test]
    fn messages_end_with_newline_then_nul() {
        for message in [EXEC_TRACE_MESSAGE, FLOW_CLASSIFY_MESSAGE] {
            assert_eq!(message[message.len() - 1], 0);
            assert_eq!(message[message.len() - 2], b'\n');
            // No interior NULs; the terminator is the only one.
            assert!(!message[..message.len() - 1].contains(&0));
        }
    }

    #[test]
    fn hook_identifiers() {
        assert_eq!(EXEC_TRACE_HOOK, "tracepoint/syscalls/sys_enter_execve");
        assert_eq!(FLOW_CLASSIFY_HOOK, "kprobe/security_sk_classify_flow");
    }

    #[test]
    fn license_footer_is_nul_terminated_gpl() {
        assert_eq!(&LICENSE, b"GPL\0");
    }

    #[test]
    fn version_footer_sentinel() {
        assert_eq!(PROGRAM_VERSION, 0xFFFF_FFFE);
    }
}
