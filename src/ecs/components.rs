//! Interaction data records attached to entities
//!
//! The set of data kinds is closed: every record implements the sealed
//! `DataRecord` trait and names its `DataKind`.

use std::fmt;

use glam::Vec3;

use crate::scene::ObjectHandle;

/// Every kind of data record an entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Transform3DRef,
    Interactable,
    Button,
    Rotating,
    InstructionVisibility,
    CalibrationOffset,
    NeedsCalibration,
}

impl DataKind {
    pub const ALL: [DataKind; 7] = [
        DataKind::Transform3DRef,
        DataKind::Interactable,
        DataKind::Button,
        DataKind::Rotating,
        DataKind::InstructionVisibility,
        DataKind::CalibrationOffset,
        DataKind::NeedsCalibration,
    ];
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A record type that can live in the entity store
pub trait DataRecord: hecs::Component + sealed::Sealed {
    const KIND: DataKind;
}

macro_rules! data_record {
    ($ty:ty => $kind:ident) => {
        impl sealed::Sealed for $ty {}
        impl DataRecord for $ty {
            const KIND: DataKind = DataKind::$kind;
        }
    };
}

/// Non-owning reference to a renderable owned by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef(pub ObjectHandle);

/// Marks an entity as a ray-pick target
#[derive(Debug, Clone, Copy, Default)]
pub struct Interactable;

/// Continuous idle rotation
#[derive(Debug, Clone, Copy, Default)]
pub struct Rotating;

/// Visible only while at least one hand pointer is tracked
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionVisibility;

/// Position relative to the head pose, applied once by calibration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationOffset(pub Vec3);

/// Pending calibration; removed when calibration fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NeedsCalibration;

/// Per-frame button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    None,
    Hovered,
    Pressed,
}

/// Zero-argument callback run on a press
pub type ButtonAction = Box<dyn FnMut() -> anyhow::Result<()> + Send + Sync>;

/// Two-slot button state machine with its press action
///
/// `previous_state` is written only by the button system.
pub struct Button {
    pub current_state: ButtonState,
    pub previous_state: ButtonState,
    pub action: ButtonAction,
}

impl Button {
    pub fn new<F>(action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::with_action(Box::new(action))
    }

    pub fn with_action(action: ButtonAction) -> Self {
        Self {
            current_state: ButtonState::None,
            previous_state: ButtonState::None,
            action,
        }
    }

    /// Button with no side effect
    pub fn inert() -> Self {
        Self::new(|| Ok(()))
    }

    /// True when this frame is a press and the last one was not
    pub fn is_rising_edge(&self) -> bool {
        self.current_state == ButtonState::Pressed && self.previous_state != ButtonState::Pressed
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("current_state", &self.current_state)
            .field("previous_state", &self.previous_state)
            .finish_non_exhaustive()
    }
}

data_record!(ObjectRef => Transform3DRef);
data_record!(Interactable => Interactable);
data_record!(Button => Button);
data_record!(Rotating => Rotating);
data_record!(InstructionVisibility => InstructionVisibility);
data_record!(CalibrationOffset => CalibrationOffset);
data_record!(NeedsCalibration => NeedsCalibration);
