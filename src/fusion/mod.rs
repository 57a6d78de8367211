mod aux_channel;
pub use aux_channel::AuxChannel;

mod frame;
pub use frame::{AuxFrame, FusionFrame};

mod params;
pub use params::{VisibilityParameters, VolumeParameters};

mod dense_volume;
pub use dense_volume::{DenseFusionSummary, DenseFusionVolume};

mod observation;
pub use observation::{FreespaceEvidence, PointObservation, Visibility};

mod point_visibility;
pub use point_visibility::{FreespaceFusion, PointVisibilityFusion, VisibilitySummary};
