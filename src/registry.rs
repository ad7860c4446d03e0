//! The fixed table of capabilities a user can pick from.

use crate::error::Result;
use crate::models::{Capability, CapabilityId, ResultKind};

const CAPABILITIES: [Capability; CapabilityId::ALL.len()] = [
    Capability {
        id: CapabilityId::Enhance,
        title: "Beautify a Memory",
        description: "Edit your photo with a text instruction.",
        icon: "camera",
        premium: true,
        min_inputs: 1,
        max_inputs: 1,
        supports_quality: false,
        output: ResultKind::Image,
        offers_suggestion: true,
    },
    Capability {
        id: CapabilityId::FutureChild,
        title: "Future Mirror",
        description: "Who will your baby look like? (Pro)",
        icon: "baby",
        premium: true,
        min_inputs: 2,
        max_inputs: 2,
        supports_quality: true,
        output: ResultKind::Image,
        offers_suggestion: false,
    },
    Capability {
        id: CapabilityId::Analyze,
        title: "Deep Analysis",
        description: "Let the AI study your photo in detail.",
        icon: "search",
        premium: true,
        min_inputs: 1,
        max_inputs: 1,
        supports_quality: false,
        output: ResultKind::Text,
        offers_suggestion: false,
    },
    Capability {
        id: CapabilityId::TimeBridge,
        title: "Time Bridge",
        description: "Carry the past into the present day.",
        icon: "clock",
        premium: false,
        min_inputs: 1,
        max_inputs: 1,
        supports_quality: false,
        output: ResultKind::Image,
        offers_suggestion: false,
    },
    Capability {
        id: CapabilityId::Restore,
        title: "Revive a Memory",
        description: "Repair and colorize old photos.",
        icon: "sparkles",
        premium: false,
        min_inputs: 1,
        max_inputs: 1,
        supports_quality: false,
        output: ResultKind::Image,
        offers_suggestion: false,
    },
    Capability {
        id: CapabilityId::Album,
        title: "Family Album",
        description: "Create artistic collages.",
        icon: "users",
        premium: false,
        min_inputs: 1,
        max_inputs: 10,
        supports_quality: false,
        output: ResultKind::Image,
        offers_suggestion: false,
    },
    Capability {
        id: CapabilityId::Emotional,
        title: "Emotional Moments",
        description: "Add feeling to your memories.",
        icon: "heart",
        premium: true,
        min_inputs: 1,
        max_inputs: 1,
        supports_quality: false,
        output: ResultKind::Image,
        offers_suggestion: true,
    },
];

/// Every capability, in display order.
pub fn all() -> &'static [Capability] {
    &CAPABILITIES
}

// Rows must sit at their id's index.
const _: () = {
    let mut i = 0;
    while i < CAPABILITIES.len() {
        assert!(CAPABILITIES[i].id.index() == i, "capability rows out of order");
        i += 1;
    }
};

pub fn capability(id: CapabilityId) -> &'static Capability {
    let table: &'static [Capability] = &CAPABILITIES;
    &table[id.index()]
}

pub fn lookup(identifier: &str) -> Result<&'static Capability> {
    let id: CapabilityId = identifier.parse()?;
    Ok(capability(id))
}
