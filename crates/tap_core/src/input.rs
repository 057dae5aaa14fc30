//! Normalization of heterogeneous platform input into `ContactBatch`.

use shared::{
    domain::{ContactId, PointerReleasePolicy},
    protocol::{ContactBatch, ContactPoint, InputEvent},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputAdapter {
    policy: PointerReleasePolicy,
}

impl InputAdapter {
    pub fn new(policy: PointerReleasePolicy) -> Self {
        Self { policy }
    }

    /// Maps one raw event onto zero or more batches, in the order they must
    /// be applied.
    pub fn normalize(&self, event: InputEvent) -> Vec<ContactBatch> {
        match event {
            InputEvent::TouchStart { touches } if touches.is_empty() => Vec::new(),
            InputEvent::TouchStart { touches } => vec![ContactBatch::Began(
                touches.into_iter().map(ContactPoint::from).collect(),
            )],
            InputEvent::TouchEnd { identifiers } | InputEvent::TouchCancel { identifiers } => {
                if identifiers.is_empty() {
                    return Vec::new();
                }
                vec![ContactBatch::Ended(
                    identifiers.into_iter().map(ContactId::Touch).collect(),
                )]
            }
            InputEvent::PointerDown { x, y } => {
                let press = ContactBatch::Began(vec![ContactPoint::new(ContactId::Pointer, x, y)]);
                match self.policy {
                    PointerReleasePolicy::Implicit => {
                        vec![press, ContactBatch::Ended(vec![ContactId::Pointer])]
                    }
                    PointerReleasePolicy::Explicit => vec![press],
                }
            }
            InputEvent::PointerUp => match self.policy {
                PointerReleasePolicy::Implicit => Vec::new(),
                PointerReleasePolicy::Explicit => {
                    vec![ContactBatch::Ended(vec![ContactId::Pointer])]
                }
            },
        }
    }
}
