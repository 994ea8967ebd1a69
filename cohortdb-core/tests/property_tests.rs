//! Property-based tests using proptest.
//!
//! Verifies invariants over randomly generated cohorts rather than
//! specific values: p-value bounds, allele accounting identities,
//! kinship symmetry, and parallel/sequential equivalence of the
//! rankings.

use proptest::prelude::*;
use rand::Rng;
use rand::SeedableRng;

use cohortdb_core::engine::{DatasetRegistry, KinshipQuery, QueryEngine};
use cohortdb_core::exec::CancelToken;
use cohortdb_core::request::ExecMode;
use cohortdb_core::stats::allele;
use cohortdb_core::stats::hwe::hwe_exact_p;
use cohortdb_core::stats::kinship::PairTally;
use cohortdb_geno::cohort::{CohortRegistry, SampleInfo, Sex};
use cohortdb_geno::genotype::{Genotype, GenotypeRow};
use cohortdb_geno::matrix::{GenotypeMatrix, VariantRecord};
use cohortdb_geno::panel::PanelRegistry;
use cohortdb_geno::prs::PrsRegistry;
use cohortdb_geno::store::Store;
use cohortdb_geno::variant::{Assembly, Chromosome, VariantSite};

fn random_genotype(rng: &mut impl Rng) -> Genotype {
    match rng.gen_range(0..10) {
        0..=3 => Genotype::RefRef,
        4..=6 => Genotype::RefAlt,
        7..=8 => Genotype::AltAlt,
        _ => Genotype::Missing,
    }
}

/// Random cohort spread over several chromosomes so parallel runs
/// actually shard.
fn random_engine(seed: u64, n_samples: usize, n_variants: usize) -> QueryEngine {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let samples: Vec<SampleInfo> = (0..n_samples)
        .map(|i| {
            let sex = if rng.gen::<bool>() { Sex::Male } else { Sex::Female };
            SampleInfo::new(&format!("s{}", i), sex)
        })
        .collect();
    let chroms = [
        Chromosome::Chr1,
        Chromosome::Chr2,
        Chromosome::Chr7,
        Chromosome::Chr17,
        Chromosome::ChrX,
    ];
    let records: Vec<VariantRecord> = (0..n_variants)
        .map(|i| {
            let chrom = chroms[rng.gen_range(0..chroms.len())];
            let calls: Vec<Genotype> = (0..n_samples).map(|_| random_genotype(&mut rng)).collect();
            VariantRecord {
                site: VariantSite::at(chrom, 1000 + i as u32 * 10, "A", "G"),
                genotypes: GenotypeRow::from_calls(&calls),
            }
        })
        .collect();
    let matrix = GenotypeMatrix::load(Assembly::Grch37, samples, records).unwrap();
    let mut registry = DatasetRegistry::new();
    registry.insert(Store::new(
        matrix,
        PanelRegistry::new(),
        CohortRegistry::new(),
        PrsRegistry::new(),
    ));
    QueryEngine::new(registry)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_hwe_pvalue_in_unit_interval(
        het in 0u32..200,
        hom1 in 0u32..200,
        hom2 in 0u32..200,
    ) {
        let p = hwe_exact_p(het, hom1, hom2);
        prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
    }

    #[test]
    fn prop_allele_accounting_identities(seed in 0u64..500, n in 2usize..12) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let samples: Vec<SampleInfo> = (0..n)
            .map(|i| SampleInfo::new(&format!("s{}", i), if rng.gen() { Sex::Male } else { Sex::Female }))
            .collect();
        let calls: Vec<Genotype> = (0..n).map(|_| random_genotype(&mut rng)).collect();
        let row = GenotypeRow::from_calls(&calls);
        for chrom in [Chromosome::Chr1, Chromosome::ChrX] {
            let s = allele::compute(chrom, &row, &samples);
            // AN counts two slots per called genotype
            prop_assert_eq!(s.an, 2 * (n as u32 - s.misc));
            prop_assert!(s.ac <= s.an);
            // AF = AC/AN exactly over the observed calls
            if s.an > 0 {
                prop_assert!((s.af - s.ac as f64 / s.an as f64).abs() < 1e-15);
            } else {
                prop_assert_eq!(s.af, 0.0);
            }
            // genotype classes partition the called samples
            prop_assert_eq!(s.refc() + s.hetc + s.hom_total(), n as u32 - s.misc);
            // AC decomposes into hets plus two per homozygote
            prop_assert_eq!(s.ac, s.hetc + 2 * s.hom_total());
        }
    }

    #[test]
    fn prop_kinship_phi_is_symmetric(seed in 0u64..500) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let mut fwd = PairTally::default();
        let mut rev = PairTally::default();
        for _ in 0..100 {
            let a = random_genotype(&mut rng);
            let b = random_genotype(&mut rng);
            fwd.add(a, b);
            rev.add(b, a);
        }
        prop_assert_eq!(fwd.phi(), rev.phi());
        // the estimator is bounded above by self-kinship
        prop_assert!(fwd.phi() <= 0.5);
    }

    #[test]
    fn prop_top_hwe_parallel_equals_sequential(
        seed in 0u64..200,
        n_samples in 3usize..10,
        n_variants in 1usize..60,
        n in 1usize..20,
    ) {
        let engine = random_engine(seed, n_samples, n_variants);
        let cancel = CancelToken::new();
        let par = engine.top_n_hwe(Assembly::Grch37, n, ExecMode::Parallel, &cancel).unwrap();
        let seq = engine.top_n_hwe(Assembly::Grch37, n, ExecMode::Sequential, &cancel).unwrap();
        prop_assert_eq!(&par, &seq);
        prop_assert!(par.len() <= n);
        for pair in par.windows(2) {
            prop_assert!(pair[0].p_value <= pair[1].p_value);
        }
    }

    #[test]
    fn prop_top_chi2_parallel_equals_sequential(
        seed in 0u64..200,
        n_samples in 3usize..10,
        n_variants in 1usize..60,
    ) {
        let engine = random_engine(seed, n_samples, n_variants);
        let cancel = CancelToken::new();
        let subset = vec!["s0".to_string(), "s1".to_string()];
        let par = engine
            .top_n_chi2(Assembly::Grch37, None, &subset, 10, ExecMode::Parallel, &cancel)
            .unwrap();
        let seq = engine
            .top_n_chi2(Assembly::Grch37, None, &subset, 10, ExecMode::Sequential, &cancel)
            .unwrap();
        prop_assert_eq!(&par, &seq);
        for v in &par {
            prop_assert!((0.0..=1.0).contains(&v.p_value));
        }
    }

    #[test]
    fn prop_kinship_parallel_equals_sequential(
        seed in 0u64..100,
        n_samples in 2usize..7,
        n_variants in 10usize..80,
    ) {
        let engine = random_engine(seed, n_samples, n_variants);
        let cancel = CancelToken::new();
        let base = KinshipQuery {
            assembly: Assembly::Grch37,
            cohort: None,
            samples: Vec::new(),
            threshold: None,
            degree: None,
            mode: ExecMode::Parallel,
        };
        let par = engine.kinship(&base, &cancel).unwrap();
        let seq = engine
            .kinship(&KinshipQuery { mode: ExecMode::Sequential, ..base }, &cancel)
            .unwrap();
        prop_assert_eq!(&par, &seq);
        prop_assert_eq!(par.len(), n_samples * (n_samples - 1) / 2);
    }
}
