use pretty_assertions::assert_eq;
use s2s_vpngen::builder::{build_document, BuildError};
use s2s_vpngen::model::{EndpointMode, SiteSlot, Vendor};
use s2s_vpngen::policy::EnginePolicy;
use s2s_vpngen::render::to_yaml;
use s2s_vpngen::validate::RawFields;

fn request(pairs: &[(&str, &str)]) -> RawFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn single_lan_request() -> RawFields {
    request(&[
        ("vpn_name", "HQ-BRANCH"),
        ("psk", "Branch-Office-Key-7"),
        ("site1_mgmt_ip", "10.0.0.1"),
        ("site1_mgmt_user", "admin"),
        ("site1_mgmt_pass", "fortinet"),
        ("site1_wan_if", "wan1"),
        ("site1_wan_zone", "WAN"),
        ("site1_wan_address", "198.51.100.10/29"),
        ("site1_lan_zone", "LAN"),
        ("site1_lans", "internal:172.16.10.1/24"),
        ("site1_tunnel_ip", "169.254.10.1"),
        ("site1_tunnel_zone", "VPN"),
        ("site2_mgmt_ip", "10.0.0.2"),
        ("site2_mgmt_user", "admin"),
        ("site2_mgmt_pass", "paloalto"),
        ("site2_wan_if", "ethernet1-1"),
        ("site2_wan_zone", "untrust"),
        ("site2_wan_address", "203.0.113.20/29"),
        ("site2_lan_zone", "trust"),
        ("site2_lans", "ethernet1-2:172.16.20.1/24"),
        ("site2_tunnel_ip", "169.254.10.2"),
        ("site2_tunnel_if", "tunnel2"),
        ("site2_tunnel_zone", "VPN"),
        ("site2_vr_name", "vr-main"),
    ])
}

#[test]
fn single_lan_pair_builds_complete_document() {
    let doc = build_document(&single_lan_request(), &EnginePolicy::default()).expect("build");

    assert_eq!(doc.vpn.profile, "lab_legacy");
    assert_eq!(doc.vpn.tunnel_network, "169.254.10.0/30");
    assert_eq!(doc.ike.proposal.dh_group, 14);
    assert_eq!(doc.ipsec.selectors.len(), 1);
    assert_eq!(doc.ipsec.selectors[0].local_subnet, "172.16.10.0/24");
    assert_eq!(doc.ipsec.selectors[0].remote_subnet, "172.16.20.0/24");

    let fgt = doc.site(SiteSlot::Site1);
    assert_eq!(fgt.vendor, Vendor::Fortinet);
    assert_eq!(fgt.management.hostname, "FGT-S1");
    assert_eq!(fgt.tunnel.peer_wan_ip, "203.0.113.20");
    assert_eq!(fgt.tunnel.address, "169.254.10.1 255.255.255.255");
    assert_eq!(fgt.routes[0].destination, "172.16.20.0 255.255.255.0");
    assert_eq!(fgt.routes[0].interface, "HQ-BRANCH");

    let pa = doc.site(SiteSlot::Site2);
    assert_eq!(pa.vendor, Vendor::PaloAlto);
    assert_eq!(pa.tunnel.peer_wan_ip, "198.51.100.10");
    assert_eq!(pa.tunnel.remote_address, "169.254.10.1/32");
    assert_eq!(pa.routes[0].destination, "172.16.10.0/24");
    assert_eq!(pa.routes[0].interface, "tunnel2");
    assert_eq!(pa.routes[0].virtual_router.as_deref(), Some("vr-main"));
}

#[test]
fn dynamic_palo_alto_advertises_fallback_to_fortigate() {
    let mut fields = single_lan_request();
    fields.remove("site2_wan_address");
    fields.insert("site2_wan_mode".to_string(), "dynamic".to_string());
    let policy = EnginePolicy {
        dynamic_peer_fallback: Some("192.0.2.1".parse().expect("ip")),
        ..EnginePolicy::default()
    };

    let doc = build_document(&fields, &policy).expect("build");
    assert_eq!(doc.sites.site2.wan.mode, EndpointMode::Dynamic);
    assert_eq!(doc.sites.site2.wan.ip, None);
    assert_eq!(doc.sites.site1.tunnel.peer_wan_ip, "192.0.2.1");
    assert_eq!(doc.ike.site2_id_local, "192.0.2.1");
    assert_eq!(doc.ike.site1_id_remote, "192.0.2.1");
}

#[test]
fn malformed_lan_cidr_fails_in_addressing_stage() {
    let mut fields = single_lan_request();
    fields.insert("site2_lans".to_string(), "ethernet1-2:172.16.20/24".to_string());

    let err = build_document(&fields, &EnginePolicy::default()).expect_err("bad cidr");
    assert_eq!(err.stage(), "addressing");
    match err {
        BuildError::Address(e) => assert_eq!(e.field(), "site2_lans"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rendering_the_same_request_twice_is_identical() {
    let policy = EnginePolicy::default();
    let first = to_yaml(&build_document(&single_lan_request(), &policy).expect("build"))
        .expect("yaml");
    let second = to_yaml(&build_document(&single_lan_request(), &policy).expect("build"))
        .expect("yaml");
    assert_eq!(first, second);
    assert!(first.find("vpn:") < first.find("sites:"));
    assert!(first.find("ike:") < first.find("ipsec:"));
}
