//! Target Parsing Tests
//!
//! Covers:
//! - `HostSpec` server address parsing
//! - `RemotePath` normalization

use smbreach::target::{normalize, HostSpec, RemotePath};
use smbreach::NetError;

#[test]
fn test_server_address_table() {
    let cases = [
        ("fileserver", "fileserver", 445),
        ("fileserver:1445", "fileserver", 1445),
        ("192.168.1.10", "192.168.1.10", 445),
        ("192.168.1.10:139", "192.168.1.10", 139),
        ("[2001:db8::1]", "2001:db8::1", 445),
        ("[2001:db8::1]:1445", "2001:db8::1", 1445),
        ("2001:db8::1", "2001:db8::1", 445),
        ("nas.local", "nas.local", 445),
    ];

    for (input, host, port) in cases {
        let spec = HostSpec::parse(input).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        assert_eq!(spec.host(), host, "host for {input:?}");
        assert_eq!(spec.port(), port, "port for {input:?}");
    }
}

#[test]
fn test_server_address_errors() {
    assert!(matches!(HostSpec::parse(""), Err(NetError::EmptyAddress)));

    let err = HostSpec::parse("nas:smb").unwrap_err();
    assert!(matches!(err, NetError::AddressParse { ref address, .. } if address == "nas:smb"));
    assert!(err.to_string().contains("nas:smb"));
}

#[test]
fn test_remote_path_table() {
    let cases = [
        ("", "."),
        (".", "."),
        ("/", "."),
        ("\\\\server\\share", "server/share"),
        ("folder/file.txt", "folder/file.txt"),
        ("/folder/./file.txt", "folder/file.txt"),
        ("folder\\nested\\", "folder/nested"),
        ("/../../secret", "secret"),
    ];

    for (input, want) in cases {
        assert_eq!(normalize(input), want, "normalize({input:?})");
        assert_eq!(RemotePath::new(input).as_str(), want);
    }
}

#[test]
fn test_remote_path_idempotent() {
    let inputs = [
        "a\\b\\..\\c",
        "//x//y//",
        "./../z",
        "Documents\\Q1 Report.xlsx",
        "dir/../..",
    ];
    for input in inputs {
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }
}

#[test]
fn test_remote_path_upload_parent() {
    // The parent directory that must exist before a file is created.
    let remote = RemotePath::new("\\uploads\\2024\\report.pdf");
    assert_eq!(remote.parent().as_str(), "uploads/2024");
    assert!(RemotePath::new("report.pdf").parent().is_root());
}
