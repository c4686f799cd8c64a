pub mod job;
pub mod route;
pub mod status;
pub mod stop;

// Re-export core models for easy access
pub use job::{JobHandle, UploadFile};
pub use route::{DisplayModel, GeometryPoint, MapBounds, OptimizationResult, RouteSummary};
pub use status::{JobStatusReport, RawJobStatus};
pub use stop::{GeocodedStop, MapStop};
