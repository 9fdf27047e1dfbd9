//! Low-precision geocentric positions from mean orbital elements.
//!
//! Planets use the JPL Keplerian elements valid for 1800-2050, the Moon a
//! truncated ELP series (Meeus ch. 47), Chiron osculating elements near its
//! 1996 perihelion. Longitudes are referred to the mean equinox of date.

use crate::position::normalize_deg;
use crate::time::julian_centuries;
use crate::zodiac::Body;

const AU_KM: f64 = 149_597_870.7;
/// General precession in longitude, degrees per Julian century.
const PRECESSION_DEG_PER_CENTURY: f64 = 1.396_971_3;
/// Mean Earth-Moon distance in AU, reported for the lunar nodes.
const MEAN_LUNAR_DISTANCE_AU: f64 = 0.002_569_555;
const GAUSS_DAILY_MOTION_DEG: f64 = 0.985_607_668_6;

/// Geocentric ecliptic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub longitude: f64,
    pub latitude: f64,
    /// AU
    pub distance: f64,
}

/// Element value at J2000 and its rate per Julian century.
type Term = (f64, f64);

/// Mean elements: a (AU), e, I, L, long. perihelion, long. ascending node.
struct MeanElements {
    a: Term,
    e: Term,
    i: Term,
    l: Term,
    perihelion: Term,
    node: Term,
}

const MERCURY: MeanElements = MeanElements {
    a: (0.387_099_27, 0.000_000_37),
    e: (0.205_635_93, 0.000_019_06),
    i: (7.004_979_02, -0.005_947_49),
    l: (252.250_323_50, 149_472.674_111_75),
    perihelion: (77.457_796_28, 0.160_476_89),
    node: (48.330_765_93, -0.125_340_81),
};

const VENUS: MeanElements = MeanElements {
    a: (0.723_335_66, 0.000_003_90),
    e: (0.006_776_72, -0.000_041_07),
    i: (3.394_676_05, -0.000_788_90),
    l: (181.979_099_50, 58_517.815_387_29),
    perihelion: (131.602_467_18, 0.002_683_29),
    node: (76.679_842_55, -0.277_694_18),
};

const EARTH_MOON_BARYCENTER: MeanElements = MeanElements {
    a: (1.000_002_61, 0.000_005_62),
    e: (0.016_711_23, -0.000_043_92),
    i: (-0.000_015_31, -0.012_946_68),
    l: (100.464_571_66, 35_999.372_449_81),
    perihelion: (102.937_681_93, 0.323_273_64),
    node: (0.0, 0.0),
};

const MARS: MeanElements = MeanElements {
    a: (1.523_710_34, 0.000_018_47),
    e: (0.093_394_10, 0.000_078_82),
    i: (1.849_691_42, -0.008_131_31),
    l: (-4.553_432_05, 19_140.302_684_99),
    perihelion: (-23.943_629_59, 0.444_410_88),
    node: (49.559_538_91, -0.292_573_43),
};

const JUPITER: MeanElements = MeanElements {
    a: (5.202_887_00, -0.000_116_07),
    e: (0.048_386_24, -0.000_132_53),
    i: (1.304_396_95, -0.001_837_14),
    l: (34.396_440_51, 3_034.746_127_75),
    perihelion: (14.728_479_83, 0.212_526_68),
    node: (100.473_909_09, 0.204_691_06),
};

const SATURN: MeanElements = MeanElements {
    a: (9.536_675_94, -0.001_250_60),
    e: (0.053_861_79, -0.000_509_91),
    i: (2.485_991_87, 0.001_936_09),
    l: (49.954_244_23, 1_222.493_622_01),
    perihelion: (92.598_878_31, -0.418_972_16),
    node: (113.662_424_48, -0.288_677_94),
};

const URANUS: MeanElements = MeanElements {
    a: (19.189_164_64, -0.001_961_76),
    e: (0.047_257_44, -0.000_043_97),
    i: (0.772_637_83, -0.002_429_39),
    l: (313.238_104_51, 428.482_027_85),
    perihelion: (170.954_276_30, 0.408_052_81),
    node: (74.016_925_03, 0.042_405_89),
};

const NEPTUNE: MeanElements = MeanElements {
    a: (30.069_922_76, 0.000_262_91),
    e: (0.008_590_48, 0.000_051_05),
    i: (1.770_043_47, 0.000_353_72),
    l: (-55.120_029_69, 218.459_453_25),
    perihelion: (44.964_762_27, -0.322_414_64),
    node: (131.784_225_74, -0.005_086_64),
};

const PLUTO: MeanElements = MeanElements {
    a: (39.482_116_75, -0.000_315_96),
    e: (0.248_827_30, 0.000_051_70),
    i: (17.140_012_06, 0.000_048_18),
    l: (238.929_038_33, 145.207_805_15),
    perihelion: (224.068_916_29, -0.040_629_42),
    node: (110.303_936_84, -0.011_834_82),
};

/// Chiron osculating elements (J2000 ecliptic) around the 1996 perihelion.
mod chiron {
    pub const A: f64 = 13.648;
    pub const E: f64 = 0.3801;
    pub const I: f64 = 6.935;
    pub const NODE: f64 = 209.38;
    pub const ARG_PERIHELION: f64 = 339.36;
    pub const PERIHELION_JD: f64 = 2_450_128.0;
}

/// Eccentric anomaly (radians) by Newton iteration on Kepler's equation.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = mean_anomaly + eccentricity * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (ea - eccentricity * ea.sin() - mean_anomaly) / (1.0 - eccentricity * ea.cos());
        ea -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Heliocentric ecliptic rectangular coordinates (AU, J2000 frame).
fn orbit_position(a: f64, e: f64, i: f64, node: f64, arg_perihelion: f64, mean_anomaly: f64) -> [f64; 3] {
    let m = normalize_deg(mean_anomaly + 180.0) - 180.0;
    let ea = solve_kepler(m.to_radians(), e);

    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (so, co) = arg_perihelion.to_radians().sin_cos();
    let (sn, cn) = node.to_radians().sin_cos();
    let (si, ci) = i.to_radians().sin_cos();

    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

fn heliocentric(elements: &MeanElements, t: f64) -> [f64; 3] {
    let at = |term: Term| term.0 + term.1 * t;
    let perihelion = at(elements.perihelion);
    let node = at(elements.node);
    orbit_position(
        at(elements.a),
        at(elements.e),
        at(elements.i),
        node,
        perihelion - node,
        at(elements.l) - perihelion,
    )
}

fn chiron_heliocentric(jd: f64) -> [f64; 3] {
    let n = GAUSS_DAILY_MOTION_DEG / chiron::A.powf(1.5);
    orbit_position(
        chiron::A,
        chiron::E,
        chiron::I,
        chiron::NODE,
        chiron::ARG_PERIHELION,
        n * (jd - chiron::PERIHELION_JD),
    )
}

/// Geocentric coordinates of a heliocentric J2000 vector, precessed to date.
fn geocentric_of_date(helio: [f64; 3], earth: [f64; 3], t: f64) -> Spherical {
    let x = helio[0] - earth[0];
    let y = helio[1] - earth[1];
    let z = helio[2] - earth[2];
    let rho = (x * x + y * y).sqrt();
    Spherical {
        longitude: normalize_deg(y.atan2(x).to_degrees() + PRECESSION_DEG_PER_CENTURY * t),
        latitude: z.atan2(rho).to_degrees(),
        distance: (rho * rho + z * z).sqrt(),
    }
}

/// Mean longitude of the Moon's ascending node (Meeus 47.7).
pub fn mean_lunar_node(t: f64) -> f64 {
    normalize_deg(
        125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t * t + t * t * t / 467_441.0
            - t * t * t * t / 60_616_000.0,
    )
}

// (D, M, M', F, longitude 1e-6°, distance 1e-3 km)
const MOON_LONGITUDE_DISTANCE: &[(f64, f64, f64, f64, f64, f64)] = &[
    (0.0, 0.0, 1.0, 0.0, 6_288_774.0, -20_905_355.0),
    (2.0, 0.0, -1.0, 0.0, 1_274_027.0, -3_699_111.0),
    (2.0, 0.0, 0.0, 0.0, 658_314.0, -2_955_968.0),
    (0.0, 0.0, 2.0, 0.0, 213_618.0, -569_925.0),
    (0.0, 1.0, 0.0, 0.0, -185_116.0, 48_888.0),
    (0.0, 0.0, 0.0, 2.0, -114_332.0, -3_149.0),
    (2.0, 0.0, -2.0, 0.0, 58_793.0, 246_158.0),
    (2.0, -1.0, -1.0, 0.0, 57_066.0, -152_138.0),
    (2.0, 0.0, 1.0, 0.0, 53_322.0, -170_733.0),
    (2.0, -1.0, 0.0, 0.0, 45_758.0, -204_586.0),
    (0.0, 1.0, -1.0, 0.0, -40_923.0, -129_620.0),
    (1.0, 0.0, 0.0, 0.0, -34_720.0, 108_743.0),
    (0.0, 1.0, 1.0, 0.0, -30_383.0, 104_755.0),
    (2.0, 0.0, 0.0, -2.0, 15_327.0, 10_321.0),
    (0.0, 0.0, 1.0, 2.0, -12_528.0, 0.0),
    (0.0, 0.0, 1.0, -2.0, 10_980.0, 79_661.0),
    (4.0, 0.0, -1.0, 0.0, 10_675.0, -34_782.0),
    (0.0, 0.0, 3.0, 0.0, 10_034.0, -23_210.0),
    (4.0, 0.0, -2.0, 0.0, 8_548.0, -21_636.0),
    (2.0, 1.0, -1.0, 0.0, -7_888.0, 24_208.0),
    (2.0, 1.0, 0.0, 0.0, -6_766.0, 30_824.0),
    (1.0, 0.0, -1.0, 0.0, -5_163.0, -8_379.0),
    (1.0, 1.0, 0.0, 0.0, 4_987.0, -16_675.0),
    (2.0, -1.0, 1.0, 0.0, 4_036.0, -12_831.0),
];

// (D, M, M', F, latitude 1e-6°)
const MOON_LATITUDE: &[(f64, f64, f64, f64, f64)] = &[
    (0.0, 0.0, 0.0, 1.0, 5_128_122.0),
    (0.0, 0.0, 1.0, 1.0, 280_602.0),
    (0.0, 0.0, 1.0, -1.0, 277_693.0),
    (2.0, 0.0, 0.0, -1.0, 173_237.0),
    (2.0, 0.0, -1.0, 1.0, 55_413.0),
    (2.0, 0.0, -1.0, -1.0, 46_271.0),
    (2.0, 0.0, 0.0, 1.0, 32_573.0),
    (0.0, 0.0, 2.0, 1.0, 17_198.0),
    (2.0, 0.0, 1.0, -1.0, 9_266.0),
    (0.0, 0.0, 2.0, -1.0, 8_822.0),
    (2.0, -1.0, 0.0, -1.0, 8_216.0),
    (2.0, 0.0, -2.0, -1.0, 4_324.0),
];

fn moon(t: f64) -> Spherical {
    let poly = |c: [f64; 3]| c[0] + c[1] * t + c[2] * t * t;
    let l_prime = poly([218.316_447_7, 481_267.881_234_21, -0.001_578_6]);
    let d = poly([297.850_192_1, 445_267.111_403_4, -0.001_881_9]).to_radians();
    let m = poly([357.529_109_2, 35_999.050_290_9, -0.000_153_6]).to_radians();
    let m_prime = poly([134.963_396_4, 477_198.867_505_5, 0.008_741_4]).to_radians();
    let f = poly([93.272_095_0, 483_202.017_523_3, -0.003_653_9]).to_radians();
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let eccentricity_factor = |m_coeff: f64| e.powi(m_coeff.abs() as i32);

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(cd, cm, cmp, cf, sl, sr) in MOON_LONGITUDE_DISTANCE {
        let arg = cd * d + cm * m + cmp * m_prime + cf * f;
        let k = eccentricity_factor(cm);
        sum_l += sl * k * arg.sin();
        sum_r += sr * k * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, sb) in MOON_LATITUDE {
        let arg = cd * d + cm * m + cmp * m_prime + cf * f;
        sum_b += sb * eccentricity_factor(cm) * arg.sin();
    }

    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let lp = l_prime.to_radians();
    sum_l += 3_958.0 * a1.sin() + 1_962.0 * (lp - f).sin() + 318.0 * a2.sin();
    sum_b += -2_235.0 * lp.sin() + 382.0 * a3.sin() + 175.0 * (a1 - f).sin()
        + 175.0 * (a1 + f).sin()
        + 127.0 * (lp - m_prime).sin()
        - 115.0 * (lp + m_prime).sin();

    Spherical {
        longitude: normalize_deg(l_prime + sum_l / 1e6),
        latitude: sum_b / 1e6,
        distance: (385_000.56 + sum_r / 1000.0) / AU_KM,
    }
}

/// Geocentric position of a body at a Julian Day.
pub fn geocentric(body: Body, jd: f64) -> Spherical {
    let t = julian_centuries(jd);
    let earth = || heliocentric(&EARTH_MOON_BARYCENTER, t);
    let planet = |elements: &MeanElements| geocentric_of_date(heliocentric(elements, t), earth(), t);

    match body {
        Body::Sun => geocentric_of_date([0.0; 3], earth(), t),
        Body::Moon => moon(t),
        Body::Mercury => planet(&MERCURY),
        Body::Venus => planet(&VENUS),
        Body::Mars => planet(&MARS),
        Body::Jupiter => planet(&JUPITER),
        Body::Saturn => planet(&SATURN),
        Body::Uranus => planet(&URANUS),
        Body::Neptune => planet(&NEPTUNE),
        Body::Pluto => planet(&PLUTO),
        Body::Chiron => geocentric_of_date(chiron_heliocentric(jd), earth(), t),
        Body::NorthNode => Spherical {
            longitude: mean_lunar_node(t),
            latitude: 0.0,
            distance: MEAN_LUNAR_DISTANCE_AU,
        },
        Body::SouthNode => Spherical {
            longitude: normalize_deg(mean_lunar_node(t) + 180.0),
            latitude: 0.0,
            distance: MEAN_LUNAR_DISTANCE_AU,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::separation;
    use crate::time::J2000_JD;

    #[test]
    fn kepler_circular_orbit_is_identity() {
        assert!((solve_kepler(1.234, 0.0) - 1.234).abs() < 1e-12);
    }

    #[test]
    fn kepler_satisfies_equation() {
        for &(m, e) in &[(0.3, 0.2), (2.9, 0.25), (-1.0, 0.38), (3.1, 0.05)] {
            let ea = solve_kepler(m, e);
            assert!((ea - e * ea.sin() - m).abs() < 1e-10);
        }
    }

    #[test]
    fn sun_at_j2000() {
        // Apparent solar longitude at J2000.0 is about 280.37°
        let sun = geocentric(Body::Sun, J2000_JD);
        assert!(separation(sun.longitude, 280.37) < 0.1, "sun = {}", sun.longitude);
        assert!((sun.distance - 0.9833).abs() < 0.001);
    }

    #[test]
    fn moon_meeus_example() {
        // Meeus example 47.a: 1992 April 12, 0h TD -> λ 133.16°, β -3.23°
        let moon = geocentric(Body::Moon, 2_448_724.5);
        assert!(separation(moon.longitude, 133.167) < 0.05, "moon = {}", moon.longitude);
        assert!((moon.latitude + 3.229).abs() < 0.05, "beta = {}", moon.latitude);
        let km = moon.distance * AU_KM;
        assert!((km - 368_409.7).abs() < 300.0, "distance = {km}");
    }

    #[test]
    fn nodes_are_opposite() {
        let north = geocentric(Body::NorthNode, 2_448_724.5);
        let south = geocentric(Body::SouthNode, 2_448_724.5);
        assert!((separation(north.longitude, south.longitude) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn mean_node_at_j2000() {
        assert!((mean_lunar_node(0.0) - 125.0445479).abs() < 1e-9);
    }

    #[test]
    fn inner_planets_stay_near_the_sun() {
        for day in 0..40 {
            let jd = J2000_JD + day as f64 * 37.0;
            let sun = geocentric(Body::Sun, jd).longitude;
            let mercury = geocentric(Body::Mercury, jd).longitude;
            let venus = geocentric(Body::Venus, jd).longitude;
            assert!(separation(sun, mercury) < 28.5, "day {day}");
            assert!(separation(sun, venus) < 47.5, "day {day}");
        }
    }

    #[test]
    fn chiron_period_is_about_fifty_years() {
        let n = GAUSS_DAILY_MOTION_DEG / chiron::A.powf(1.5);
        let years = 360.0 / n / 365.25;
        assert!((years - 50.4).abs() < 1.0, "period = {years}");
    }
}
