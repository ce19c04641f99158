//! Integer subsampling of decoded images.
//!
//! A ratio of `n` keeps every output dimension at `floor(dim / n)`, never
//! below one pixel.

use super::FilterType;

/// Dimensions after subsampling by `ratio`. A ratio of 0 is treated as 1.
pub fn subsampled_dimensions(width: u32, height: u32, ratio: u32) -> (u32, u32) {
    let ratio = ratio.max(1);
    ((width / ratio).max(1), (height / ratio).max(1))
}

/// Downsample an image by an integer `ratio`.
///
/// Returns the input untouched when `ratio <= 1`.
pub fn downsample(image: image::RgbImage, ratio: u32, filter: FilterType) -> image::RgbImage {
    if ratio <= 1 {
        return image;
    }

    let (src_width, src_height) = image.dimensions();
    let target = subsampled_dimensions(src_width, src_height, ratio);
    resize_to(image, target, filter)
}

/// Resize to exactly `(width, height)`, skipping the copy when already there.
pub fn resize_to(
    image: image::RgbImage,
    (width, height): (u32, u32),
    filter: FilterType,
) -> image::RgbImage {
    if image.dimensions() == (width, height) {
        return image;
    }
    image::imageops::resize(&image, width, height, filter.to_image_filter())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> image::RgbImage {
        image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 255) / width.max(1)) as u8,
                ((y * 255) / height.max(1)) as u8,
                128,
            ])
        })
    }

    #[test]
    fn test_subsampled_dimensions() {
        assert_eq!(subsampled_dimensions(4000, 3000, 4), (1000, 750));
        assert_eq!(subsampled_dimensions(4001, 3001, 2), (2000, 1500));
        assert_eq!(subsampled_dimensions(10, 10, 1), (10, 10));
    }

    #[test]
    fn test_subsampled_dimensions_never_zero() {
        assert_eq!(subsampled_dimensions(3, 1, 4), (1, 1));
        assert_eq!(subsampled_dimensions(10, 10, 0), (10, 10));
    }

    #[test]
    fn test_downsample_ratio_one_is_identity() {
        let img = create_test_image(40, 30);
        let out = downsample(img.clone(), 1, FilterType::Bilinear);
        assert_eq!(out, img);
    }

    #[test]
    fn test_downsample_halves() {
        let img = create_test_image(40, 30);
        let out = downsample(img, 2, FilterType::Bilinear);
        assert_eq!(out.dimensions(), (20, 15));
    }

    #[test]
    fn test_downsample_all_filters() {
        for filter in [FilterType::Nearest, FilterType::Bilinear, FilterType::Lanczos3] {
            let out = downsample(create_test_image(90, 60), 3, filter);
            assert_eq!(out.dimensions(), (30, 20), "filter {:?}", filter);
        }
    }

    #[test]
    fn test_resize_to_exact_target() {
        let out = resize_to(create_test_image(61, 41), (40, 26), FilterType::Bilinear);
        assert_eq!(out.dimensions(), (40, 26));

        let img = create_test_image(40, 26);
        assert_eq!(resize_to(img.clone(), (40, 26), FilterType::Nearest), img);
    }

    #[test]
    fn test_downsample_preserves_solid_color() {
        let img = image::RgbImage::from_pixel(64, 64, image::Rgb([200, 100, 50]));
        let out = downsample(img, 4, FilterType::Bilinear);
        assert_eq!(out.get_pixel(5, 5).0, [200, 100, 50]);
    }
}
