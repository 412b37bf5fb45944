//! Unit tests for the unwrap loop.

use super::*;
use crate::test_utils::{
    TarFixture, ZipFixture, elf_executable, elf_shared_library, gzip, nested_gzip, xz, zstd,
};
use rstest::{fixture, rstest};

#[fixture]
fn trivy() -> ResolvedBinary {
    ResolvedBinary::new("trivy")
}

fn unwrap_default(data: Vec<u8>, binary: &ResolvedBinary) -> Result<BinaryContent, UnwrapError> {
    ContentUnwrapper::default().unwrap_content(RawContent::from(data), binary)
}

#[rstest]
fn bare_executable_is_returned_unchanged(trivy: ResolvedBinary) {
    let elf = elf_executable();
    let out = unwrap_default(elf.clone(), &trivy).expect("unwrap");
    assert_eq!(out.as_bytes(), elf.as_slice());
}

#[rstest]
fn shared_library_is_a_payload(trivy: ResolvedBinary) {
    let so = elf_shared_library();
    let out = unwrap_default(so.clone(), &trivy).expect("unwrap");
    assert_eq!(out.as_bytes(), so.as_slice());
}

#[rstest]
fn gzip_tarball_yields_named_entry(trivy: ResolvedBinary) {
    let elf = elf_executable();
    let tar = TarFixture::new()
        .file("LICENSE", b"license text")
        .dir("bin/")
        .file("bin/trivy", &elf)
        .file("contrib/trivy.tpl", b"template")
        .build()
        .expect("tar");
    let out = unwrap_default(gzip(&tar).expect("gzip"), &trivy).expect("unwrap");
    assert_eq!(out.as_bytes(), elf.as_slice());
}

#[rstest]
#[case::gzip_of_xz(gzip(&xz(&elf_executable()).expect("xz")).expect("gzip"))]
#[case::xz_of_gzip(xz(&gzip(&elf_executable()).expect("gzip")).expect("xz"))]
#[case::zstd_tarball(zstd(&TarFixture::new().file("trivy", &elf_executable()).build().expect("tar")).expect("zstd"))]
#[case::zip_of_gzip(ZipFixture::new().file("dist/trivy", &gzip(&elf_executable()).expect("gzip")).build().expect("zip"))]
fn nested_layers_are_fully_unwrapped(trivy: ResolvedBinary, #[case] data: Vec<u8>) {
    let out = unwrap_default(data, &trivy).expect("unwrap");
    assert_eq!(out.as_bytes(), elf_executable().as_slice());
}

#[rstest]
#[case::directory_only(TarFixture::new().dir("trivy/").build().expect("tar"))]
#[case::absent(TarFixture::new().file("bin/other", b"x").build().expect("tar"))]
#[case::symlink_only(TarFixture::new().symlink("trivy", "bin/real").build().expect("tar"))]
fn tar_without_regular_match_fails(trivy: ResolvedBinary, #[case] tar: Vec<u8>) {
    let err = unwrap_default(gzip(&tar).expect("gzip"), &trivy).expect_err("should fail");
    assert!(matches!(
        err,
        UnwrapError::EntryNotFound {
            container: ContentType::Tar,
            ..
        }
    ));
}

#[rstest]
fn zip_directory_only_fails(trivy: ResolvedBinary) {
    let zip = ZipFixture::new().dir("trivy/").build().expect("zip");
    let err = unwrap_default(zip, &trivy).expect_err("should fail");
    assert!(matches!(
        err,
        UnwrapError::EntryNotFound {
            container: ContentType::Zip,
            ..
        }
    ));
}

#[rstest]
#[case::at_limit(16, true)]
#[case::beyond_limit(17, false)]
fn depth_cap_is_enforced(trivy: ResolvedBinary, #[case] layers: usize, #[case] succeeds: bool) {
    let data = nested_gzip(&elf_executable(), layers).expect("gzip");
    let result = unwrap_default(data, &trivy);
    if succeeds {
        assert!(result.is_ok());
    } else {
        assert!(matches!(
            result,
            Err(UnwrapError::ExtractionTooDeep { limit: DEFAULT_MAX_DEPTH })
        ));
    }
}

#[rstest]
fn custom_depth_cap(trivy: ResolvedBinary) {
    let data = nested_gzip(&elf_executable(), 2).expect("gzip");
    let err = ContentUnwrapper::new(1)
        .unwrap_content(RawContent::from(data), &trivy)
        .expect_err("should fail");
    assert!(matches!(err, UnwrapError::ExtractionTooDeep { limit: 1 }));
}

#[rstest]
#[case::bzip2(b"BZh91AY&SY".to_vec(), ContentType::Bzip2)]
#[case::text(b"#!/bin/sh\nexit 0\n".to_vec(), ContentType::Text)]
#[case::empty(Vec::new(), ContentType::Empty)]
#[case::gzipped_text(gzip(b"hello\n").expect("gzip"), ContentType::Text)]
fn unsupported_types_are_named(
    trivy: ResolvedBinary,
    #[case] data: Vec<u8>,
    #[case] expected: ContentType,
) {
    let err = unwrap_default(data, &trivy).expect_err("should fail");
    assert!(matches!(
        err,
        UnwrapError::UnsupportedContentType { content_type } if content_type == expected
    ));
    assert!(err.to_string().contains(expected.mime()));
}
