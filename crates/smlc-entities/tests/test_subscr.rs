use smlc_core::debug;
use smlc_core::identity::Imsi;
use smlc_entities::SubscriberRegistry;

const USE_FOO: &str = "foo";
const USE_BAR: &str = "bar";

fn imsi(digits: &str) -> Imsi {
    Imsi::new(digits).unwrap()
}

fn assert_subscr(registry: &mut SubscriberRegistry, wanted: &Imsi) {
    let found = registry.find(wanted, "check").expect("subscriber should exist");
    assert_eq!(found.imsi, *wanted);
    registry.put(wanted, "check");
}

#[test]
fn subscriber_allocation_and_deletion() {
    debug::setup_logging_verbose();

    let mut registry = SubscriberRegistry::new();
    let imsi1 = imsi("1234567890");
    let imsi2 = imsi("9876543210");
    let imsi3 = imsi("423423");

    // Check for emptiness
    assert_eq!(registry.len(), 0);
    assert!(registry.find(&imsi1, "-").is_none());
    assert!(registry.find(&imsi2, "-").is_none());
    assert!(registry.find(&imsi3, "-").is_none());

    // Allocate entry 1
    registry.find_or_create(&imsi1, USE_FOO);
    assert_eq!(registry.len(), 1);
    assert_subscr(&mut registry, &imsi1);
    assert_eq!(registry.len(), 1);
    assert!(registry.find(&imsi2, "-").is_none());

    // Allocate entry 2
    registry.find_or_create(&imsi2, USE_BAR);
    assert_eq!(registry.len(), 2);

    // Allocate entry 3 with two holds
    registry.find_or_create(&imsi3, USE_FOO);
    registry.get(&imsi3, USE_BAR);
    assert_eq!(registry.len(), 3);

    // Check entries
    assert_subscr(&mut registry, &imsi1);
    assert_subscr(&mut registry, &imsi2);
    assert_subscr(&mut registry, &imsi3);

    // Free entry 1
    registry.put(&imsi1, USE_FOO);
    assert_eq!(registry.len(), 2);
    assert!(registry.find(&imsi1, "-").is_none());

    assert_subscr(&mut registry, &imsi2);
    assert_subscr(&mut registry, &imsi3);

    // Free entry 2
    registry.put(&imsi2, USE_BAR);
    assert_eq!(registry.len(), 1);
    assert!(registry.find(&imsi1, "-").is_none());
    assert!(registry.find(&imsi2, "-").is_none());
    assert_subscr(&mut registry, &imsi3);

    // Remove one of entry 3's two holds
    registry.put(&imsi3, USE_BAR);
    assert_subscr(&mut registry, &imsi3);
    assert_eq!(registry.len(), 1);

    // Free entry 3
    registry.put(&imsi3, USE_FOO);
    assert_eq!(registry.len(), 0);
    assert!(registry.find(&imsi3, "-").is_none());
}

#[test]
fn one_record_per_imsi() {
    let mut registry = SubscriberRegistry::new();
    let id = imsi("1234567890");

    registry.find_or_create(&id, USE_FOO);
    registry.find_or_create(&id, USE_BAR);
    assert_eq!(registry.len(), 1);

    registry.put(&id, USE_FOO);
    assert!(registry.contains(&id));
    registry.put(&id, USE_BAR);
    assert!(!registry.contains(&id));
}

#[test]
#[should_panic(expected = "put on unknown subscriber")]
fn put_without_record_is_a_bug() {
    let mut registry = SubscriberRegistry::new();
    registry.put(&imsi("1234567890"), USE_FOO);
}
