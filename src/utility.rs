//! Small numeric helpers shared by the plotting code.

/// `num` evenly spaced values from `start` to `stop`, both ends included.
///
/// A single value is just `start`, zero values is an empty vector.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Values from `start` towards `stop` in steps of `step`, `stop` excluded.
///
/// A negative step counts down. A zero step is an empty range.
pub(crate) fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || (stop - start) / step <= 0.0 {
        return vec![];
    }

    let num = ((stop - start) / step).ceil() as usize;
    (0..num).map(|i| start + step * i as f64).collect()
}


#[cfg(test)]
mod test {
    use super::test_tools::*;
    use super::*;

    #[test]
    fn test_linspace() {
        let vals = linspace(1000.0, 100.0, 50);
        assert_eq!(vals.len(), 50);
        assert!(approx_equal(vals[0], 1000.0, 1.0e-10));
        assert!(approx_equal(vals[49], 100.0, 1.0e-10));
        assert!(approx_equal(vals[1] - vals[0], -900.0 / 49.0, 1.0e-10));

        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 1.0, 1), vec![3.0]);
    }

    #[test]
    fn test_arange() {
        assert_eq!(arange(233.0, 263.0, 10.0), vec![233.0, 243.0, 253.0]);
        assert_eq!(arange(1000.0, 940.0, -20.0), vec![1000.0, 980.0, 960.0]);
        assert_eq!(arange(0.0, 1.0, 0.4).len(), 3);

        assert!(arange(0.0, 1.0, 0.0).is_empty());
        assert!(arange(0.0, 1.0, -1.0).is_empty());
    }
}
