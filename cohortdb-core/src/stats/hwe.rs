//! Exact Hardy-Weinberg equilibrium test.
//!
//! Wigginton, Cutler & Abecasis (2005) exact test on the observed
//! genotype counts (het, hom-rare, hom-common). The p-value is the
//! total probability of heterozygote configurations no more likely than
//! the observed one, conditional on the allele counts.
//!
//! Reference: Wigginton et al., AJHG 76:887-893.

/// Exact HWE p-value from genotype counts. `hom1` and `hom2` are the
/// two homozygote counts in either order. Returns 1.0 when no
/// genotypes are observed.
pub fn hwe_exact_p(het: u32, hom1: u32, hom2: u32) -> f64 {
    let obs_hets = het as usize;
    let obs_homr = hom1.min(hom2) as usize;
    let obs_homc = hom1.max(hom2) as usize;

    let genotypes = obs_hets + obs_homr + obs_homc;
    if genotypes == 0 {
        return 1.0;
    }
    let rare_copies = 2 * obs_homr + obs_hets;

    let mut het_probs = vec![0.0f64; rare_copies + 1];

    // start at the most probable heterozygote count, with matching parity
    let mut mid = rare_copies * (2 * genotypes - rare_copies) / (2 * genotypes);
    if mid % 2 != rare_copies % 2 {
        mid += 1;
    }

    het_probs[mid] = 1.0;
    let mut sum = 1.0;

    let mut curr_hets = mid;
    let mut curr_homr = (rare_copies - mid) / 2;
    let mut curr_homc = genotypes - curr_hets - curr_homr;
    while curr_hets > 1 {
        het_probs[curr_hets - 2] = het_probs[curr_hets]
            * (curr_hets * (curr_hets - 1)) as f64
            / (4.0 * ((curr_homr + 1) * (curr_homc + 1)) as f64);
        sum += het_probs[curr_hets - 2];
        curr_hets -= 2;
        curr_homr += 1;
        curr_homc += 1;
    }

    let mut curr_hets = mid;
    let mut curr_homr = (rare_copies - mid) / 2;
    let mut curr_homc = genotypes - curr_hets - curr_homr;
    while curr_hets + 2 <= rare_copies {
        het_probs[curr_hets + 2] = het_probs[curr_hets]
            * (4 * curr_homr * curr_homc) as f64
            / (((curr_hets + 2) * (curr_hets + 1)) as f64);
        sum += het_probs[curr_hets + 2];
        curr_hets += 2;
        curr_homr -= 1;
        curr_homc -= 1;
    }

    let obs_prob = het_probs[obs_hets] / sum;
    let p: f64 = het_probs
        .iter()
        .map(|&prob| prob / sum)
        .filter(|&prob| prob <= obs_prob)
        .sum();
    p.min(1.0)
}
