use jigsudo_core::grid::CellSet;
use jigsudo_core::sequence::MAX_SEQUENCE_LEN;
use jigsudo_core::{
    classify, generate_daily, read_document, DailyConfig, DailyGenerator, DailySeed, Error, Variant,
};
use std::collections::BTreeSet;

fn new_year() -> DailySeed {
    DailySeed::parse("20250101")
}

#[test]
fn test_new_year_board() {
    let mut generator: DailyGenerator = DailyGenerator::default();
    let board = generator.run(&new_year()).unwrap();

    assert!(board.game.solution.is_valid_solution());
    assert_eq!(board.variants.len(), 4);

    let simon: BTreeSet<u8> = board.simon_values.iter().copied().collect();
    assert_eq!(simon.len(), 3);
    assert!(simon.iter().all(|v| (1..=9).contains(v)));

    for variant in Variant::ALL {
        let vb = board.variant(variant).unwrap();
        assert_eq!(vb.grid, variant.apply(&board.game.solution));
        assert_eq!(vb.topology, classify(&vb.grid));

        let reserved: CellSet = vb.islands.iter().map(|i| i.cell).collect();
        let carved: CellSet = vb.carved.iter().copied().collect();
        let mut covered = CellSet::new();
        for seq in &vb.sequences {
            assert!(seq.is_connected());
            assert!(seq.len() <= MAX_SEQUENCE_LEN);
            for &cell in seq.cells() {
                assert!(covered.insert(cell), "{cell} covered twice");
            }
        }

        for cell in vb.topology.plain_cells() {
            if reserved.contains(cell) {
                assert!(!covered.contains(cell));
            } else {
                assert!(
                    covered.contains(cell) || carved.contains(cell),
                    "{variant}: {cell} left uncovered"
                );
            }
        }

        let realized: BTreeSet<u8> = vb.simon_cells().iter().map(|&c| vb.grid.get(c)).collect();
        assert_eq!(realized, simon);
    }

    let doc = board.to_document();
    doc.verify().unwrap();
    assert_eq!(doc.meta.date, "2025-01-01");
    assert_eq!(doc.meta.seed, 20250101);
    let keys: Vec<&str> = doc.data.search_targets.keys().map(|v| v.key()).collect();
    assert_eq!(keys, ["0", "LR", "TB", "HV"]);
}

#[test]
fn test_same_seed_same_document() {
    let a = DailyGenerator::new(DailyConfig::default()).run(&new_year()).unwrap();
    let b = DailyGenerator::new(DailyConfig::default()).run(&new_year()).unwrap();
    assert_eq!(a.to_document(), b.to_document());
}

#[test]
fn test_first_half_of_january() {
    for value in 20250101..=20250115u64 {
        let seed = DailySeed::parse(&value.to_string());
        let mut generator: DailyGenerator = DailyGenerator::default();
        let board = generator
            .run(&seed)
            .unwrap_or_else(|e| panic!("{value}: {e}"));
        assert_eq!(board.seed.value, value);
        board.to_document().verify().unwrap();
    }
}

#[test]
fn test_generate_daily_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let seed = DailySeed::parse("demo");
    let mut generator: DailyGenerator = DailyGenerator::default();
    let (board, path) = generate_daily(&mut generator, &seed, dir.path()).unwrap();

    assert_eq!(path, dir.path().join("daily-custom-demo.json"));
    let doc = read_document(&path).unwrap();
    assert_eq!(doc, board.to_document());
    assert_eq!(doc.meta.seed, 12345);
    assert_eq!(doc.meta.date, "custom-demo");
}

#[test]
fn test_generate_daily_numeric_custom_seed() {
    let dir = tempfile::tempdir().unwrap();
    let seed = DailySeed::parse("42");
    let mut generator: DailyGenerator = DailyGenerator::default();
    let (board, path) = generate_daily(&mut generator, &seed, dir.path()).unwrap();

    assert_eq!(path, dir.path().join("daily-custom-42.json"));
    assert_eq!(board.seed.value, 42);
    assert_eq!(read_document(&path).unwrap().meta.seed, 42);
}

#[test]
fn test_exhausted_budget_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("puzzles");
    let config = DailyConfig {
        max_attempts: 3,
        node_budget: Some(0),
        ..DailyConfig::default()
    };
    let mut generator = DailyGenerator::new(config);
    let seed = new_year();

    let err = generate_daily(&mut generator, &seed, &out).unwrap_err();
    assert!(matches!(err, Error::AttemptBudgetExhausted { attempts: 3 }));
    assert!(!out.join(seed.file_name()).exists());
}
