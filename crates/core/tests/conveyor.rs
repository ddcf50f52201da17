use orchard_core::{Catalog, Conveyor, InventoryError, Location, RngState, SymbolId, SymbolInstance};

struct Spawner {
    catalog: Catalog,
    rng: RngState,
    next_id: u32,
}

impl Spawner {
    fn new() -> Self {
        Self {
            catalog: Catalog::builtin(),
            rng: RngState::from_seed(21),
            next_id: 100,
        }
    }

    fn spawn(&mut self) -> SymbolInstance {
        let id = SymbolId(self.next_id);
        self.next_id += 1;
        self.catalog.generate(&mut self.rng, id, Location::InInventory(0))
    }
}

fn ids(conveyor: &Conveyor) -> Vec<Option<u32>> {
    conveyor
        .slots()
        .iter()
        .map(|slot| slot.as_ref().map(|symbol| symbol.id.0))
        .collect()
}

#[test]
fn advance_shifts_toward_the_tail_and_refills_the_head() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(4);
    let first = spawner.spawn();
    let second = spawner.spawn();
    conveyor.insert(0, first).expect("vacant");
    conveyor.insert(2, second).expect("vacant");

    let advance = conveyor.advance(|| spawner.spawn());

    assert!(advance.evicted.is_none());
    assert_eq!(advance.moves.len(), 2);
    assert_eq!(advance.spawned, Some(SymbolId(102)));
    assert_eq!(ids(&conveyor), vec![Some(102), Some(100), None, Some(101)]);
    for (slot, symbol) in conveyor.slots().iter().enumerate() {
        if let Some(symbol) = symbol {
            assert_eq!(symbol.location, Location::InInventory(slot));
        }
    }
    conveyor.check_invariants().expect("conveyor invariants");
}

#[test]
fn tail_eviction_only_loses_the_tail() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(3);
    for slot in 0..3 {
        conveyor.insert(slot, spawner.spawn()).expect("vacant");
    }

    let advance = conveyor.advance(|| spawner.spawn());

    let evicted = advance.evicted.expect("tail was occupied");
    assert_eq!(evicted.id, SymbolId(102));
    assert_eq!(evicted.location, Location::Destroyed);
    assert_eq!(ids(&conveyor), vec![Some(103), Some(100), Some(101)]);
    conveyor.check_invariants().expect("conveyor invariants");
}

#[test]
fn shift_waits_for_an_occupied_tail() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(3);
    conveyor.insert(0, spawner.spawn()).expect("vacant");
    conveyor.insert(2, spawner.spawn()).expect("vacant");
    let before = ids(&conveyor);
    assert!(conveyor.shift().is_empty());
    assert_eq!(ids(&conveyor), before);
}

#[test]
fn refill_skips_an_occupied_head() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(3);
    conveyor.insert(1, spawner.spawn()).expect("vacant");
    conveyor.insert(2, spawner.spawn()).expect("vacant");
    conveyor.insert(0, spawner.spawn()).expect("vacant");
    let (moves, spawned) = conveyor.shift_and_refill(|| spawner.spawn());
    assert!(moves.is_empty());
    assert!(spawned.is_none());
    assert_eq!(conveyor.occupied_slots().len(), 3);
}

#[test]
fn repeated_advances_keep_every_symbol_until_evicted() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(8);
    let mut seen = 0;
    let mut evicted = 0;
    for _ in 0..40 {
        let before = conveyor.occupied_slots().len();
        let advance = conveyor.advance(|| spawner.spawn());
        if advance.evicted.is_some() {
            evicted += 1;
        }
        if advance.spawned.is_some() {
            seen += 1;
        }
        let after = conveyor.occupied_slots().len();
        let lost = usize::from(advance.evicted.is_some());
        let gained = usize::from(advance.spawned.is_some());
        assert_eq!(after, before - lost + gained);
        conveyor.check_invariants().expect("conveyor invariants");
    }
    assert_eq!(seen - evicted, conveyor.occupied_slots().len());
}

#[test]
fn slot_queries() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(4);
    assert_eq!(conveyor.first_vacant(), Some(0));
    assert_eq!(conveyor.last_occupied_unplaced(), None);
    conveyor.insert(0, spawner.spawn()).expect("vacant");
    conveyor.insert(2, spawner.spawn()).expect("vacant");
    assert_eq!(conveyor.first_vacant(), Some(1));
    assert_eq!(conveyor.last_occupied_unplaced(), Some(2));
    assert_eq!(conveyor.find(SymbolId(101)), Some(2));
    assert_eq!(conveyor.find(SymbolId(7)), None);
}

#[test]
fn insert_rejects_bad_slots() {
    let mut spawner = Spawner::new();
    let mut conveyor = Conveyor::new(2);
    conveyor.insert(0, spawner.spawn()).expect("vacant");
    assert_eq!(
        conveyor.insert(0, spawner.spawn()),
        Err(InventoryError::SlotOccupied(0))
    );
    assert_eq!(
        conveyor.insert(5, spawner.spawn()),
        Err(InventoryError::NoSuchSlot(5))
    );
}
