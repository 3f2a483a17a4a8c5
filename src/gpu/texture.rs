//! Render attachments and the sampled matcap texture.

use crate::assets::matcap::MatcapImage;

/// Depth buffer format shared by the depth target and every pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Matcap texels are sampled as raw data, without an sRGB decode.
pub const MATCAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Sample count used when antialiasing is on.
pub const MSAA_SAMPLES: u32 = 4;

fn attachment(
    device: &wgpu::Device,
    label: &str,
    (width, height): (u32, u32),
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// A depth attachment sized to the surface.
pub struct DepthTarget {
    /// Full-texture view; keeps the texture alive.
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    /// Create a depth attachment of the given size and sample count. Zero
    /// dimensions are bumped to one texel.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        Self {
            view: attachment(
                device,
                "Depth Target",
                (width, height),
                DEPTH_FORMAT,
                sample_count,
            ),
        }
    }
}

/// Multisampled color attachment resolved into the swapchain texture.
pub struct MsaaTarget {
    /// Full-texture view; keeps the texture alive.
    pub view: wgpu::TextureView,
}

impl MsaaTarget {
    /// Create a multisampled color attachment in the surface format, or
    /// `None` when `sample_count` is 1 and the pass draws straight into the
    /// swapchain.
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Option<Self> {
        (sample_count > 1).then(|| Self {
            view: attachment(
                device,
                "MSAA Color Target",
                (width, height),
                format,
                sample_count,
            ),
        })
    }
}

/// A matcap image uploaded in [`MATCAP_FORMAT`].
pub struct MatcapTexture {
    /// Full-texture view; keeps the texture alive.
    pub view: wgpu::TextureView,
}

impl MatcapTexture {
    /// Upload `image` to a new texture.
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &MatcapImage,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Matcap Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: MATCAP_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            size,
        );
        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcap_is_sampled_without_srgb_decode() {
        assert!(!MATCAP_FORMAT.is_srgb());
        assert_eq!(MATCAP_FORMAT.block_copy_size(None), Some(4));
    }

    #[test]
    fn attachment_formats_support_msaa() {
        let flags = wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4;
        assert!(DEPTH_FORMAT
            .guaranteed_format_features(wgpu::Features::empty())
            .flags
            .contains(flags));
        assert!(wgpu::TextureFormat::Bgra8UnormSrgb
            .guaranteed_format_features(wgpu::Features::empty())
            .flags
            .contains(flags));
        assert_eq!(MSAA_SAMPLES, 4);
    }
}
