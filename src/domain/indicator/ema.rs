//! Exponential Moving Average.
//!
//! k = 2/(n+1). The first value is the SMA of the first n valid inputs, then
//! EMA[i] = V[i]*k + EMA[i-1]*(1-k). `NaN` inputs are skipped: they produce an
//! unavailable output and leave the running average untouched.

pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len()];
    if period == 0 {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema: Option<f64> = None;
    let mut seed_sum = 0.0;
    let mut seed_count = 0usize;

    for (i, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match ema {
            Some(prev) => {
                let next = value * k + prev * (1.0 - k);
                ema = Some(next);
                out[i] = next;
            }
            None => {
                seed_sum += value;
                seed_count += 1;
                if seed_count == period {
                    let seed = seed_sum / period as f64;
                    ema = Some(seed);
                    out[i] = seed;
                }
            }
        }
    }

    out
}
