//! Error Types
//!
//! This module defines the error types used throughout the renderer.
//!
//! # Overview
//!
//! [`RenderError`] covers only the *fatal* taxonomy (§7): conditions that
//! abort the current frame and are logged, never the recoverable or
//! validation conditions, which are handled inline and reported through
//! `log::warn!` or collected into [`crate::packet::ValidationIssue`]
//! instead of propagating as an `Err`.
//!
//! ```rust,ignore
//! use vesper::errors::{RenderError, Result};
//!
//! fn acquire_command_list() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The fatal error taxonomy for the renderer (§7).
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to request a compatible GPU adapter.
    #[error("failed to request a GPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create a surface for presentation.
    #[error("failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    /// The GPU device was lost mid-session. Fatal, engine-wide; the
    /// renderer does not attempt device-removal recovery (§7).
    #[error("GPU device lost: {0}")]
    DeviceLost(String),

    /// `AcquireCommandList` could not obtain a free command-list slot
    /// (all `N` slots still awaiting their retirement fence).
    #[error("failed to acquire a command list: {0}")]
    CommandListAcquireFailed(String),

    /// Mapping a CPU-accessible buffer failed.
    #[error("failed to map buffer for CPU access: {0}")]
    BufferMapFailed(#[from] wgpu::BufferAsyncError),

    /// `GetTemporaryRenderTarget` could not create a required transient
    /// render target.
    #[error("failed to create transient render target: {0}")]
    TransientTargetCreateFailed(String),

    /// Surface was lost or is outdated and needs reconfiguration.
    #[error("surface error: {0}")]
    SurfaceError(#[from] wgpu::SurfaceError),
}

/// Alias for `Result<T, RenderError>`.
pub type Result<T> = std::result::Result<T, RenderError>;
