// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use gwr_atp_core::types::AtpError;
use gwr_atp_profile::distribution::{
    AddressRole, Dimension, DistributionSpec, SizeSpec, resolve_address, resolve_random,
    resolve_size,
};
use gwr_atp_profile::settings::Settings;

fn settings(yaml: &str) -> Settings {
    Settings::from_yaml_str(yaml).unwrap()
}

#[test]
fn linear_defaults() {
    let address = resolve_address(&settings("size: 64"), "read_", AddressRole::Read).unwrap();
    assert_eq!(
        address.spec,
        DistributionSpec::Linear {
            base: 0,
            increment: 0
        }
    );
    assert!(!address.explicit_base);
}

#[test]
fn linear_from_keys() {
    let address = resolve_address(
        &settings("write_base_address: 0x8000_0000\nwrite_incr: 64"),
        "write_",
        AddressRole::Write,
    )
    .unwrap();
    assert_eq!(
        address.spec,
        DistributionSpec::Linear {
            base: 0x8000_0000,
            increment: 64
        }
    );
    assert!(address.explicit_base);
}

#[test]
fn explicit_linear_type() {
    let address = resolve_address(
        &settings("read_address_random_type: LINEAR\nread_incr: 32"),
        "read_",
        AddressRole::Read,
    )
    .unwrap();
    assert_eq!(
        address.spec,
        DistributionSpec::Linear {
            base: 0,
            increment: 32
        }
    );
}

#[test]
fn random_families() {
    let s = settings(
        "
read_address_random_type: UNIFORM
read_address_random_min: 0
read_address_random_max: 4KiB
write_address_random_type: NORMAL
write_address_random_mean: 2048
write_address_random_std_dev: 12.5
size_random_type: WEIBULL
size_random_shape: 1.5
size_random_scale: 64
x_size_random_type: POISSON
x_size_random_mean: 32
",
    );
    assert_eq!(
        resolve_address(&s, "read_", AddressRole::Read).unwrap().spec,
        DistributionSpec::Uniform { min: 0, max: 4096 }
    );
    assert_eq!(
        resolve_address(&s, "write_", AddressRole::Write).unwrap().spec,
        DistributionSpec::Normal {
            mean: 2048.0,
            std_dev: 12.5
        }
    );
    assert_eq!(
        resolve_size(&s, "").unwrap(),
        SizeSpec::Random(DistributionSpec::Weibull {
            shape: 1.5,
            scale: 64.0
        })
    );
    assert_eq!(
        resolve_random(&s, "x_", Dimension::Size).unwrap(),
        Some(DistributionSpec::Poisson { mean: 32.0 })
    );
}

#[test]
fn fixed_size() {
    assert_eq!(resolve_size(&settings("size: 64"), "").unwrap(), SizeSpec::Fixed(64));
    assert_eq!(
        resolve_size(&settings("size_random_type: FIXED\nsize: 128"), "").unwrap(),
        SizeSpec::Fixed(128)
    );
}

#[test]
fn missing_parameters() {
    assert_eq!(
        resolve_address(
            &settings("read_address_random_type: UNIFORM\nread_address_random_min: 0"),
            "read_",
            AddressRole::Read
        ),
        Err(AtpError::MissingParameter(
            "read_address_random_max".to_string()
        ))
    );
    assert_eq!(
        resolve_size(&settings("ot_limit: 1"), ""),
        Err(AtpError::MissingParameter("size".to_string()))
    );
}

#[test]
fn unsupported_families() {
    assert_eq!(
        resolve_address(
            &settings("read_address_random_type: GAMMA"),
            "read_",
            AddressRole::Read
        ),
        Err(AtpError::UnsupportedDistribution("GAMMA".to_string()))
    );
    assert_eq!(
        resolve_size(&settings("size_random_type: LINEAR"), ""),
        Err(AtpError::UnsupportedDistribution("LINEAR".to_string()))
    );
}

#[test]
fn advance_past_linear_read() {
    let s = settings("read_base_address: 0x1000\nread_incr: 64\nwrite_incr: 64");
    let read = resolve_address(&s, "read_", AddressRole::Read).unwrap();
    let write = resolve_address(&s, "write_", AddressRole::Write).unwrap();
    let advanced = write.advanced_past(&read.spec, 10).unwrap();
    assert_eq!(
        advanced.spec,
        DistributionSpec::Linear {
            base: 0x1000 + 640,
            increment: 64
        }
    );

    // An explicit write base is kept
    let s = settings("read_incr: 64\nwrite_base_address: 0x10\nwrite_incr: 64");
    let read = resolve_address(&s, "read_", AddressRole::Read).unwrap();
    let write = resolve_address(&s, "write_", AddressRole::Write).unwrap();
    assert_eq!(write.advanced_past(&read.spec, 10).unwrap(), write);

    // A random read address leaves the write address alone
    let random = DistributionSpec::Uniform { min: 0, max: 10 };
    let write = resolve_address(&settings("write_incr: 8"), "write_", AddressRole::Write).unwrap();
    assert_eq!(write.advanced_past(&random, 10).unwrap(), write);
}

#[test]
fn summary_labels() {
    let s = settings("read_address_random_type: POISSON\nread_address_random_mean: 7");
    let address = resolve_address(&s, "read_", AddressRole::PointerChaseRead).unwrap();
    assert_eq!(
        address.summary(),
        vec![
            "PC READ Address Type: POISSON".to_string(),
            "PC READ Address Mean: 7".to_string(),
        ]
    );
}
