//! Saturated adiabats found by integrating the moist lapse rate in pressure.
use metfor::{HectoPascal, Kelvin, Quantity};

// Largest pressure step (hPa) taken by the integrator.
const MAX_STEP: f64 = 5.0;

/// Temperature change with pressure (K/hPa) of a saturated parcel.
///
/// Where metfor has no saturation vapor pressure for the temperature (outside -80 C to 50 C)
/// the moisture terms are dropped and this is the dry adiabatic rate.
fn moist_lapse_rate(pressure: f64, temperature: f64) -> f64 {
    let rd = metfor::Rd.unpack();
    let cpd = metfor::cpd.unpack();

    let t = Kelvin(temperature);
    let (rs, lv) = metfor::mixing_ratio(t, HectoPascal(pressure))
        .and_then(|rs| metfor::latent_heat_of_condensation_vaporization(t).map(|lv| (rs, lv.0)))
        .unwrap_or((0.0, 0.0));

    let numerator = rd * temperature + lv * rs;
    let denominator = cpd + lv * lv * rs * metfor::epsilon / (rd * temperature * temperature);

    numerator / denominator / pressure
}

/// Temperature along the saturated adiabat through `t0` at `pressure[0]`, one value per
/// pressure.
pub(crate) fn moist_adiabat(t0: Kelvin, pressure: &[HectoPascal]) -> Vec<Kelvin> {
    let mut temperatures = Vec::with_capacity(pressure.len());

    let mut last_p = match pressure.first() {
        Some(p) => p.unpack(),
        None => return temperatures,
    };
    let mut t = t0.unpack();

    for p in pressure.iter().map(|p| p.unpack()) {
        let steps = ((p - last_p).abs() / MAX_STEP).ceil().max(1.0);
        let h = (p - last_p) / steps;

        let mut p_i = last_p;
        for _ in 0..steps as usize {
            let k1 = moist_lapse_rate(p_i, t);
            let k2 = moist_lapse_rate(p_i + h / 2.0, t + h / 2.0 * k1);
            let k3 = moist_lapse_rate(p_i + h / 2.0, t + h / 2.0 * k2);
            let k4 = moist_lapse_rate(p_i + h, t + h * k3);

            t += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
            p_i += h;
        }

        temperatures.push(Kelvin(t));
        last_p = p;
    }

    temperatures
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::{linspace, test_tools::approx_equal};

    fn chart_pressures() -> Vec<HectoPascal> {
        linspace(1000.0, 100.0, 50)
            .into_iter()
            .map(HectoPascal)
            .collect()
    }

    #[test]
    fn test_reaches_top_for_every_t0() {
        let pressure = chart_pressures();

        for t0 in (0..34).map(|i| Kelvin(233.0 + 5.0 * i as f64)) {
            let temps = moist_adiabat(t0, &pressure);

            assert_eq!(temps.len(), pressure.len(), "t0 = {:?}", t0);
            assert!(approx_equal(temps[0].unpack(), t0.unpack(), 1.0e-9));
            assert!(temps.iter().all(|t| t.unpack().is_finite()));
            // Cooling all the way up.
            assert!(temps.windows(2).all(|w| w[1] < w[0]), "t0 = {:?}", t0);
        }
    }

    #[test]
    fn test_conserves_theta_e() {
        let pressure: Vec<_> = vec![1000.0, 850.0, 700.0, 500.0]
            .into_iter()
            .map(HectoPascal)
            .collect();

        let t0 = Kelvin(293.15);
        let temps = moist_adiabat(t0, &pressure);

        let theta_e = |t: Kelvin, p: HectoPascal| {
            metfor::equiv_pot_temperature(t, t, p)
                .unwrap()
                .unpack()
        };
        let start = theta_e(t0, pressure[0]);
        let end = theta_e(temps[3], pressure[3]);
        assert!(approx_equal(start, end, 3.0), "{} != {}", start, end);
    }

    #[test]
    fn test_cold_adiabat_nearly_dry() {
        let pressure = chart_pressures();
        let t0 = Kelvin(243.0);

        let top = moist_adiabat(t0, &pressure)[49].unpack();
        let dry = metfor::temperature_from_pot_temp(t0, HectoPascal(100.0)).unpack();

        assert!(top > dry - 0.01);
        assert!(top - dry < 3.0);
    }

    #[test]
    fn test_empty() {
        assert!(moist_adiabat(Kelvin(300.0), &[]).is_empty());
    }
}
