use super::*;
use crate::foundation::core::ImageInfo;
use crate::pixels::pixmap::ImmutableData;

fn a8_image(width: u32, height: u32, value: u8) -> RasterImage {
    let data: ImmutableData = vec![value; (width * height) as usize].into();
    RasterImage::from_data(ImageInfo::make_a8(width, height), data, width as usize).unwrap()
}

fn upload(
    provider: &mut RecordingTextureProvider,
    image: RasterImage,
    flags: SurfaceFlags,
    fit: BackingFit,
) -> Option<TextureProxy> {
    provider.create_texture_proxy(
        image,
        flags,
        1,
        Budgeted::Yes,
        fit,
        InternalSurfaceFlags::empty(),
    )
}

#[test]
fn immediate_provider_records_image_and_proxy() {
    let mut provider = RecordingTextureProvider::immediate();
    assert!(provider.rendering_directly());

    let proxy = upload(
        &mut provider,
        a8_image(3, 2, 200),
        SurfaceFlags::empty(),
        BackingFit::Exact,
    )
    .unwrap();
    assert_eq!((proxy.width(), proxy.height()), (3, 2));
    assert_eq!(proxy.config(), PixelConfig::Alpha8);
    assert_eq!(proxy.budgeted(), Budgeted::Yes);
    assert_eq!(provider.len(), 1);
    assert_eq!(
        provider.image(proxy.id()).unwrap().to_tight_bytes(),
        vec![200; 6]
    );
}

#[test]
fn deferred_provider_is_not_rendering_directly() {
    let mut provider = RecordingTextureProvider::deferred();
    assert!(!provider.rendering_directly());
    assert_eq!(provider.mode(), ExecutionMode::Deferred);

    let proxy = upload(
        &mut provider,
        a8_image(2, 2, 9),
        SurfaceFlags::PERFORM_INITIAL_CLEAR,
        BackingFit::Approx,
    )
    .unwrap();
    assert_eq!(proxy.fit(), BackingFit::Approx);
    assert!(
        proxy
            .surface_flags()
            .contains(SurfaceFlags::PERFORM_INITIAL_CLEAR)
    );
    assert_eq!(provider.image(proxy.id()).unwrap().to_tight_bytes(), vec![9; 4]);
}

#[test]
fn refusing_provider_records_nothing() {
    let mut provider = RecordingTextureProvider::refusing(ExecutionMode::Immediate);
    assert!(
        upload(
            &mut provider,
            a8_image(1, 1, 0),
            SurfaceFlags::empty(),
            BackingFit::Exact
        )
        .is_none()
    );
    assert!(provider.is_empty());
}

#[test]
fn zero_sample_count_is_rejected() {
    let mut provider = RecordingTextureProvider::immediate();
    let proxy = provider.create_texture_proxy(
        a8_image(1, 1, 0),
        SurfaceFlags::empty(),
        0,
        Budgeted::No,
        BackingFit::Exact,
        InternalSurfaceFlags::empty(),
    );
    assert!(proxy.is_none());
    assert!(provider.is_empty());
}

#[test]
fn proxy_ids_are_distinct() {
    let mut provider = RecordingTextureProvider::immediate();
    let a = upload(&mut provider, a8_image(1, 1, 0), SurfaceFlags::empty(), BackingFit::Exact)
        .unwrap();
    let b = upload(&mut provider, a8_image(1, 1, 0), SurfaceFlags::empty(), BackingFit::Exact)
        .unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(provider.proxy(b.id()), Some(&b));
}
