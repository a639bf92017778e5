//! Marks every socket flow classification in the kernel trace ring.

use anyhow::Result;
use tracemark_common::{FLOW_CLASSIFY_HOOK, FLOW_CLASSIFY_PROGRAM};

use crate::probes::{Probe, ProbeDescriptor};

/// Kprobe on `security_sk_classify_flow`. Each time the kernel classifies a
/// socket flow, one `{security_sk_classify_flow}` line lands in the trace
/// ring.
pub struct FlowClassifyProbe;

impl Probe for FlowClassifyProbe {
    fn descriptor(&self) -> Result<ProbeDescriptor> {
        ProbeDescriptor::parse(FLOW_CLASSIFY_PROGRAM, FLOW_CLASSIFY_HOOK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::AttachPoint;

    #[test]
    fn descriptor_targets_flow_classify_kprobe() {
        let descriptor = FlowClassifyProbe.descriptor().unwrap();
        assert_eq!(descriptor.program, "flow_classify");
        assert_eq!(
            descriptor.attach_point,
            AttachPoint::Kprobe {
                symbol: "security_sk_classify_flow".to_owned(),
            }
        );
    }
}
