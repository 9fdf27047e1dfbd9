//! Sidereal time, chart angles and house division.

use crate::ephemeris::types::HouseSystem;
use crate::position::{arc_forward, normalize_deg};
use crate::time::{julian_centuries, J2000_JD};

const MAX_PLACIDUS_ITERATIONS: usize = 100;
const PLACIDUS_TOLERANCE_DEG: f64 = 1e-9;

/// Why a house system produced no cusps.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseFailure {
    /// The cusp points never rise or never set at this latitude.
    Circumpolar { latitude: f64 },
    NoConvergence { cusp: usize },
}

/// Local sidereal frame for one instant and place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angles {
    /// Right ascension of the meridian, degrees
    pub ramc: f64,
    /// Mean obliquity of the ecliptic, degrees
    pub obliquity: f64,
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Mean obliquity of the ecliptic of date (IAU 1980 polynomial).
pub fn mean_obliquity_deg(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    23.439_291_111 - 0.013_004_167 * t - 1.639e-7 * t * t + 5.036e-7 * t * t * t
}

/// Greenwich mean sidereal time in degrees (Meeus 12.4).
pub fn gmst_deg(jd: f64) -> f64 {
    let t = julian_centuries(jd);
    normalize_deg(
        280.460_618_37 + 360.985_647_366_29 * (jd - J2000_JD) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Local sidereal time (RAMC) in degrees for an east-positive longitude.
pub fn local_sidereal_deg(jd: f64, east_longitude: f64) -> f64 {
    normalize_deg(gmst_deg(jd) + east_longitude)
}

/// Ecliptic longitude rising on the eastern horizon.
pub fn ascendant_deg(ramc: f64, latitude: f64, obliquity: f64) -> f64 {
    let (r, phi, eps) = (ramc.to_radians(), latitude.to_radians(), obliquity.to_radians());
    let y = r.cos();
    let x = -(r.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_deg(y.atan2(x).to_degrees())
}

/// Ecliptic longitude culminating on the upper meridian.
pub fn midheaven_deg(ramc: f64, obliquity: f64) -> f64 {
    let (r, eps) = (ramc.to_radians(), obliquity.to_radians());
    normalize_deg(r.sin().atan2(r.cos() * eps.cos()).to_degrees())
}

pub fn angles(jd: f64, latitude: f64, east_longitude: f64) -> Angles {
    let obliquity = mean_obliquity_deg(jd);
    let ramc = local_sidereal_deg(jd, east_longitude);
    Angles {
        ramc,
        obliquity,
        ascendant: ascendant_deg(ramc, latitude, obliquity),
        midheaven: midheaven_deg(ramc, obliquity),
    }
}

/// Twelve cusps for the given system, index 0 = house 1.
pub fn house_cusps(
    system: HouseSystem,
    angles: &Angles,
    latitude: f64,
) -> Result<[f64; 12], HouseFailure> {
    match system {
        HouseSystem::Placidus => placidus(angles, latitude),
        HouseSystem::Porphyry => Ok(porphyry(angles.ascendant, angles.midheaven)),
        HouseSystem::Equal => Ok(equal(angles.ascendant)),
        HouseSystem::WholeSign => Ok(whole_sign(angles.ascendant)),
    }
}

/// Equal houses: 30° steps from the ascendant.
pub fn equal(ascendant: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize_deg(ascendant + 30.0 * i as f64);
    }
    cusps
}

/// Whole-sign houses: house 1 is the whole sign holding the ascendant.
pub fn whole_sign(ascendant: f64) -> [f64; 12] {
    equal((normalize_deg(ascendant) / 30.0).floor() * 30.0)
}

/// Porphyry: each quadrant between the angles is trisected.
pub fn porphyry(ascendant: f64, midheaven: f64) -> [f64; 12] {
    let ic = normalize_deg(midheaven + 180.0);
    let descendant = normalize_deg(ascendant + 180.0);

    let q1 = arc_forward(ascendant, ic);
    let q2 = arc_forward(ic, descendant);
    let q3 = arc_forward(descendant, midheaven);
    let q4 = arc_forward(midheaven, ascendant);

    let mut cusps = [0.0; 12];
    for (quadrant, (start, span)) in [(ascendant, q1), (ic, q2), (descendant, q3), (midheaven, q4)]
        .into_iter()
        .enumerate()
    {
        for step in 0..3 {
            cusps[quadrant * 3 + step] = normalize_deg(start + span * step as f64 / 3.0);
        }
    }
    cusps
}

/// Placidus: cusps trisect the semi-arcs of the degrees that cross them.
///
/// Each intermediate cusp is found by fixed-point iteration on right
/// ascension; cusps 5, 6, 8 and 9 are the opposites of 11, 12, 2 and 3.
pub fn placidus(angles: &Angles, latitude: f64) -> Result<[f64; 12], HouseFailure> {
    if latitude.abs() >= 90.0 - angles.obliquity {
        return Err(HouseFailure::Circumpolar { latitude });
    }

    let ramc = angles.ramc;
    // (cusp number, anchor offset from RAMC, semi-arc fraction, above horizon)
    let targets = [
        (11, 0.0, 1.0 / 3.0, true),
        (12, 0.0, 2.0 / 3.0, true),
        (2, 180.0, 2.0 / 3.0, false),
        (3, 180.0, 1.0 / 3.0, false),
    ];

    let mut cusps = [0.0; 12];
    cusps[0] = angles.ascendant;
    cusps[9] = angles.midheaven;

    for (cusp, anchor, fraction, diurnal) in targets {
        cusps[cusp - 1] =
            placidus_cusp(cusp, ramc, latitude, angles.obliquity, anchor, fraction, diurnal)?;
    }

    cusps[3] = normalize_deg(cusps[9] + 180.0);
    cusps[4] = normalize_deg(cusps[10] + 180.0);
    cusps[5] = normalize_deg(cusps[11] + 180.0);
    cusps[6] = normalize_deg(cusps[0] + 180.0);
    cusps[7] = normalize_deg(cusps[1] + 180.0);
    cusps[8] = normalize_deg(cusps[2] + 180.0);
    Ok(cusps)
}

fn placidus_cusp(
    cusp: usize,
    ramc: f64,
    latitude: f64,
    obliquity: f64,
    anchor: f64,
    fraction: f64,
    diurnal: bool,
) -> Result<f64, HouseFailure> {
    let (phi, eps) = (latitude.to_radians(), obliquity.to_radians());
    let ra_for = |semi_arc: f64| {
        if diurnal {
            ramc + anchor + fraction * semi_arc
        } else {
            ramc + anchor - fraction * semi_arc
        }
    };

    let mut ra = ra_for(90.0);
    for _ in 0..MAX_PLACIDUS_ITERATIONS {
        let r = ra.to_radians();
        let longitude = r.sin().atan2(r.cos() * eps.cos());
        let declination = (eps.sin() * longitude.sin()).asin();

        let x = -phi.tan() * declination.tan();
        if !(-1.0..=1.0).contains(&x) {
            return Err(HouseFailure::Circumpolar { latitude });
        }
        let dsa = x.acos().to_degrees();
        let semi_arc = if diurnal { dsa } else { 180.0 - dsa };

        let next = ra_for(semi_arc);
        if (next - ra).abs() < PLACIDUS_TOLERANCE_DEG {
            let r = next.to_radians();
            let lon = r.sin().atan2(r.cos() * eps.cos()).to_degrees();
            return Ok(normalize_deg(lon));
        }
        ra = next;
    }
    Err(HouseFailure::NoConvergence { cusp })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::validate_cusps;

    const EPS: f64 = 23.4392911;

    #[test]
    fn gmst_at_j2000() {
        assert!((gmst_deg(J2000_JD) - 280.46061837).abs() < 1e-9);
    }

    #[test]
    fn gmst_meeus_example() {
        // Meeus example 12.a: 1987 April 10, 0h UT -> 13h10m46.3668s
        let gmst = gmst_deg(2_446_895.5);
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15.0;
        assert!((gmst - expected).abs() < 1e-4, "gmst = {gmst}");
    }

    #[test]
    fn equator_angles_at_zero_ramc() {
        assert!((ascendant_deg(0.0, 0.0, EPS) - 90.0).abs() < 1e-9);
        assert!(midheaven_deg(0.0, EPS).abs() < 1e-9);
        assert!((midheaven_deg(90.0, EPS) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn london_ascendant_at_sidereal_midnight() {
        // Tables of houses for 51°32'N give the ascendant near 26° Cancer at 0h
        let asc = ascendant_deg(0.0, 51.5, EPS);
        assert!((asc - 116.6).abs() < 0.5, "asc = {asc}");
    }

    #[test]
    fn ascendant_leads_midheaven_by_a_quadrant_or_so() {
        for ramc in [0.0, 45.0, 133.0, 250.0, 321.0] {
            let asc = ascendant_deg(ramc, 40.0, EPS);
            let mc = midheaven_deg(ramc, EPS);
            let gap = arc_forward(mc, asc);
            assert!(gap > 0.0 && gap < 180.0, "ramc {ramc}: mc {mc}, asc {asc}");
        }
    }

    #[test]
    fn equal_and_whole_sign() {
        let cusps = equal(100.0);
        assert_eq!(cusps[0], 100.0);
        assert_eq!(cusps[3], 190.0);
        assert_eq!(cusps[11], 70.0);

        let whole = whole_sign(100.0);
        assert_eq!(whole[0], 90.0);
        assert_eq!(whole[1], 120.0);
    }

    #[test]
    fn porphyry_trisects_quadrants() {
        let cusps = porphyry(100.0, 10.0);
        assert_eq!(cusps[0], 100.0);
        assert_eq!(cusps[3], 190.0);
        assert_eq!(cusps[9], 10.0);
        assert!((cusps[1] - 130.0).abs() < 1e-9);
        validate_cusps(&cusps).unwrap();
    }

    #[test]
    fn placidus_matches_equator_expectation() {
        // At the equator every semi-arc is 90°, so cusps fall 30° apart in RA
        let a = angles(J2000_JD, 0.0, 0.0);
        let cusps = placidus(&a, 0.0).unwrap();
        validate_cusps(&cusps).unwrap();
        assert_eq!(cusps[0], a.ascendant);
        assert_eq!(cusps[9], a.midheaven);
    }

    #[test]
    fn placidus_is_monotonic_at_mid_latitudes() {
        for lat in [-55.0, -33.9, 0.0, 25.0, 40.7, 51.5, 58.0] {
            for ramc in [0.0, 37.0, 90.0, 155.0, 210.0, 300.0] {
                let a = Angles {
                    ramc,
                    obliquity: EPS,
                    ascendant: ascendant_deg(ramc, lat, EPS),
                    midheaven: midheaven_deg(ramc, EPS),
                };
                let cusps = placidus(&a, lat).unwrap();
                validate_cusps(&cusps).unwrap_or_else(|e| panic!("lat {lat} ramc {ramc}: {e}"));
            }
        }
    }

    #[test]
    fn placidus_london_table_of_houses() {
        // 51°30'N at sidereal time 0h: 11th 9° Taurus, 12th 22° Gemini, 2nd 12° Leo, 3rd 3° Virgo
        let a = Angles {
            ramc: 0.0,
            obliquity: EPS,
            ascendant: ascendant_deg(0.0, 51.5, EPS),
            midheaven: midheaven_deg(0.0, EPS),
        };
        let cusps = placidus(&a, 51.5).unwrap();
        let expected = [(10, 38.65), (11, 82.43), (1, 132.62), (2, 152.55)];
        for (index, lon) in expected {
            assert!((cusps[index] - lon).abs() < 0.05, "cusp {}: {}", index + 1, cusps[index]);
        }
    }

    #[test]
    fn placidus_fails_inside_polar_circle() {
        let a = angles(J2000_JD, 70.0, 25.0);
        assert_eq!(
            placidus(&a, 70.0),
            Err(HouseFailure::Circumpolar { latitude: 70.0 })
        );
        // the quadrant systems still work there
        validate_cusps(&porphyry(a.ascendant, a.midheaven)).unwrap();
    }
}
