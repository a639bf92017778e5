//! Probe descriptors: which kernel attach point a program binds to.
//!
//! Attach points are spelled the way eBPF section names spell them:
//! `kprobe/<symbol>`, `kretprobe/<symbol>`, `tracepoint/<category>/<name>`.
//! The prefix decides how the loader attaches the program.

use std::fmt;

use anyhow::{Result, bail};

/// Kernel attach point for a single program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachPoint {
    Tracepoint { category: String, name: String },
    Kprobe { symbol: String },
    Kretprobe { symbol: String },
}

impl fmt::Display for AttachPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachPoint::Tracepoint { category, name } => {
                write!(f, "tracepoint/{category}/{name}")
            }
            AttachPoint::Kprobe { symbol } => write!(f, "kprobe/{symbol}"),
            AttachPoint::Kretprobe { symbol } => write!(f, "kretprobe/{symbol}"),
        }
    }
}

/// Binds a program name in the compiled object to its attach point.
/// Immutable once built; owned by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeDescriptor {
    pub program: String,
    pub attach_point: AttachPoint,
}

impl ProbeDescriptor {
    /// Parses a canonical hook string into a descriptor for `program`.
    pub fn parse(program: &str, hook: &str) -> Result<Self> {
        let Some((kind, rest)) = hook.split_once('/') else {
            bail!("Hook {hook:?} has no kind prefix");
        };

        let attach_point = match kind {
            "tracepoint" => {
                let Some((category, name)) = rest.split_once('/') else {
                    bail!("Hook {hook:?} must be tracepoint/<category>/<name>");
                };
                if category.is_empty() || name.is_empty() || name.contains('/') {
                    bail!("Hook {hook:?} must be tracepoint/<category>/<name>");
                }
                AttachPoint::Tracepoint {
                    category: category.to_owned(),
                    name: name.to_owned(),
                }
            }
            "kprobe" | "kretprobe" => {
                if rest.is_empty() || rest.contains('/') {
                    bail!("Hook {hook:?} must name a single kernel symbol");
                }
                let symbol = rest.to_owned();
                if kind == "kprobe" {
                    AttachPoint::Kprobe { symbol }
                } else {
                    AttachPoint::Kretprobe { symbol }
                }
            }
            _ => bail!("Unsupported hook kind in {hook:?}"),
        };

        Ok(Self {
            program: program.to_owned(),
            attach_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracemark_common::{
        EXEC_TRACE_HOOK, EXEC_TRACE_PROGRAM, FLOW_CLASSIFY_HOOK, FLOW_CLASSIFY_PROGRAM,
    };

    #[test]
    fn parses_execve_tracepoint_hook() {
        let descriptor = ProbeDescriptor::parse(EXEC_TRACE_PROGRAM, EXEC_TRACE_HOOK).unwrap();
        assert_eq!(descriptor.program, "exec_trace");
        assert_eq!(
            descriptor.attach_point,
            AttachPoint::Tracepoint {
                category: "syscalls".to_owned(),
                name: "sys_enter_execve".to_owned(),
            }
        );
    }

    #[test]
    fn parses_flow_classify_kprobe_hook() {
        let descriptor =
            ProbeDescriptor::parse(FLOW_CLASSIFY_PROGRAM, FLOW_CLASSIFY_HOOK).unwrap();
        assert_eq!(descriptor.program, "flow_classify");
        assert_eq!(
            descriptor.attach_point,
            AttachPoint::Kprobe {
                symbol: "security_sk_classify_flow".to_owned(),
            }
        );
    }

    #[test]
    fn parses_kretprobe_hook() {
        let descriptor = ProbeDescriptor::parse("probe_exit", "kretprobe/tcp_v4_connect").unwrap();
        assert_eq!(
            descriptor.attach_point,
            AttachPoint::Kretprobe {
                symbol: "tcp_v4_connect".to_owned(),
            }
        );
    }

    #[test]
    fn rejects_malformed_hooks() {
        for hook in [
            "",
            "kprobe",
            "kprobe/",
            "kprobe/a/b",
            "tracepoint/syscalls",
            "tracepoint//sys_enter_execve",
            "tracepoint/syscalls/",
            "uprobe/libc:malloc",
        ] {
            assert!(
                ProbeDescriptor::parse("p", hook).is_err(),
                "hook {hook:?} should be rejected"
            );
        }
    }

    #[test]
    fn display_renders_canonical_hook_strings() {
        for (program, hook) in [
            (EXEC_TRACE_PROGRAM, EXEC_TRACE_HOOK),
            (FLOW_CLASSIFY_PROGRAM, FLOW_CLASSIFY_HOOK),
            ("probe_exit", "kretprobe/tcp_v4_connect"),
        ] {
            let descriptor = ProbeDescriptor::parse(program, hook).unwrap();
            assert_eq!(descriptor.attach_point.to_string(), hook);
        }
    }
}
