//! Worldtest: Feeding
//!
//! Validates:
//! - Feed consumption and saturation capping
//! - Healing never exceeds max health
//! - Rejected interactions leave creature and hand untouched

use featherlay_core::{EntityId, ItemStack, PlayerId, PropertyValue, RegistryKey};
use featherlay_testkit::{FakeEntity, FakeWorld, Fault};
use featherlay_world::{
    FeedOutcome, FeedingConfig, FeedingHandler, LayingError, PlayerInteraction, Variant,
    CHICKEN_TYPE_ID, PROP_SATURATION,
};

fn feed() -> RegistryKey {
    RegistryKey::addon("chicken_feed")
}

fn handler() -> FeedingHandler {
    FeedingHandler::new(FeedingConfig::default(), CHICKEN_TYPE_ID)
}

fn interaction(player: &PlayerId, target: &EntityId, held: Option<ItemStack>) -> PlayerInteraction {
    PlayerInteraction {
        player: player.clone(),
        target: target.clone(),
        target_type: CHICKEN_TYPE_ID.to_string(),
        held,
    }
}

fn setup(entity: FakeEntity, held: Option<ItemStack>) -> (FakeWorld, PlayerId, EntityId) {
    let mut world = FakeWorld::new();
    let id = world.spawn("c1", entity);
    let player = world.give("alex", held);
    (world, player, id)
}

#[test]
fn feeding_caps_saturation_and_consumes_one() {
    let held = Some(ItemStack::new(feed(), 5));
    let (mut world, player, id) = setup(
        FakeEntity::chicken(Variant::Base).with_property(PROP_SATURATION, PropertyValue::Int(95)),
        held.clone(),
    );

    let outcome = handler()
        .handle(&mut world, &interaction(&player, &id, held))
        .unwrap();

    assert!(matches!(outcome, FeedOutcome::Fed { saturation: 100, .. }));
    assert_eq!(world.int_property(&id, PROP_SATURATION), Some(100));
    assert_eq!(world.held(&player), Some(&ItemStack::new(feed(), 4)));
}

#[test]
fn last_feed_empties_the_hand() {
    let held = Some(ItemStack::new(feed(), 1));
    let (mut world, player, id) = setup(FakeEntity::chicken(Variant::Stone), held.clone());

    let outcome = handler()
        .handle(&mut world, &interaction(&player, &id, held))
        .unwrap();

    assert_eq!(
        outcome,
        FeedOutcome::Fed {
            saturation: 25,
            healed: 0.0,
            remaining: None,
        }
    );
    assert_eq!(world.held(&player), None);
}

#[test]
fn feeding_heals_injured_up_to_max() {
    let held = Some(ItemStack::new(feed(), 3));
    let (mut world, player, id) = setup(
        FakeEntity::chicken(Variant::Base).with_health(1.0, 4.0),
        held.clone(),
    );
    let handler = handler();

    let first = handler
        .handle(&mut world, &interaction(&player, &id, held))
        .unwrap();
    assert!(matches!(first, FeedOutcome::Fed { healed, .. } if healed == 2.0));

    let held = world.held(&player).cloned();
    let second = handler
        .handle(&mut world, &interaction(&player, &id, held))
        .unwrap();
    assert!(matches!(second, FeedOutcome::Fed { healed, .. } if healed == 1.0));

    let health = world.entity(&id).and_then(|e| e.health).unwrap();
    assert_eq!(health.current, 4.0);
    assert_eq!(world.int_property(&id, PROP_SATURATION), Some(50));
}

#[test]
fn rejected_interactions_change_nothing() {
    let feed_stack = Some(ItemStack::new(feed(), 2));
    let cases = [
        (
            "baby",
            FakeEntity::chicken(Variant::Base).baby(),
            feed_stack.clone(),
            FeedOutcome::Baby,
        ),
        (
            "satiated",
            FakeEntity::chicken(Variant::Base).with_property(PROP_SATURATION, PropertyValue::Int(100)),
            feed_stack.clone(),
            FeedOutcome::Satiated,
        ),
        (
            "wrong item",
            FakeEntity::chicken(Variant::Base),
            Some(ItemStack::new(RegistryKey::vanilla("wheat_seeds"), 2)),
            FeedOutcome::WrongItem,
        ),
        (
            "empty hand",
            FakeEntity::chicken(Variant::Base),
            None,
            FeedOutcome::WrongItem,
        ),
    ];

    for (label, entity, held, expected) in cases {
        let before_props = entity.properties.clone();
        let (mut world, player, id) = setup(entity, held.clone());
        let outcome = handler()
            .handle(&mut world, &interaction(&player, &id, held.clone()))
            .unwrap();
        assert_eq!(outcome, expected, "{label}");
        assert_eq!(world.entity(&id).unwrap().properties, before_props, "{label}");
        assert_eq!(world.held(&player), held.as_ref(), "{label}");
    }
}

#[test]
fn other_entity_types_are_ignored() {
    let held = Some(ItemStack::new(feed(), 2));
    let mut world = FakeWorld::new();
    let cow = world.spawn("cow", FakeEntity::other("minecraft:cow"));
    let player = world.give("alex", held.clone());

    let outcome = handler()
        .handle(
            &mut world,
            &PlayerInteraction {
                player: player.clone(),
                target: cow.clone(),
                target_type: "minecraft:cow".to_string(),
                held: held.clone(),
            },
        )
        .unwrap();

    assert_eq!(outcome, FeedOutcome::NotCreature);
    assert!(world.entity(&cow).unwrap().properties.is_empty());
    assert_eq!(world.held(&player), held.as_ref());
}

#[test]
fn host_rejection_surfaces_as_error() {
    let held = Some(ItemStack::new(feed(), 2));
    let (mut world, player, id) = setup(FakeEntity::chicken(Variant::Base), held.clone());
    world.fail_next(Fault::SetHeldItem, 1);

    let err = handler()
        .handle(&mut world, &interaction(&player, &id, held.clone()))
        .unwrap_err();

    assert!(matches!(err, LayingError::Engine(_)));
    assert_eq!(world.int_property(&id, PROP_SATURATION), None);
    assert_eq!(world.held(&player), held.as_ref());
}

#[test]
fn rejected_saturation_write_returns_the_feed() {
    let held = Some(ItemStack::new(feed(), 3));
    let (mut world, player, id) = setup(FakeEntity::chicken(Variant::Base), held.clone());
    world.fail_next(Fault::SetProperty, 1);

    let err = handler()
        .handle(&mut world, &interaction(&player, &id, held.clone()))
        .unwrap_err();

    assert!(matches!(err, LayingError::Engine(_)));
    assert_eq!(world.int_property(&id, PROP_SATURATION), None);
    assert_eq!(world.held(&player), held.as_ref());

    // The same interaction succeeds once the host accepts writes again.
    let outcome = handler()
        .handle(&mut world, &interaction(&player, &id, held))
        .unwrap();
    assert!(matches!(outcome, FeedOutcome::Fed { saturation: 25, .. }));
    assert_eq!(world.held(&player), Some(&ItemStack::new(feed(), 2)));
}
