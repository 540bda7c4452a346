use candle_core::Device;
use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

use super::error::EmbeddingError;

/// Selects the compute device based on enabled features (falls back to CPU).
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Using Metal GPU acceleration");
                return Ok(device);
            }
            Err(e) => {
                warn!(error = %e, "Metal device unavailable");
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Using CUDA GPU acceleration");
                return Ok(device);
            }
            Err(e) => {
                warn!(error = %e, "CUDA device unavailable");
            }
        }
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    debug!("No GPU features enabled");

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!("No GPU device available, falling back to CPU");
    }

    Ok(Device::Cpu)
}
