//! Pure-Rust eigenvalue kernel, used when LAPACK is not available
//!
//! Reduction to upper Hessenberg form by stabilized elementary similarity
//! transformations, then the Francis double-shift QR iteration on the Hessenberg
//! matrix. Only eigenvalues are computed; complex pairs are returned as conjugates.

use crate::error::{Result, SolverError};
use ndarray::Array2;
use num_complex::Complex64;

/// QR iterations allowed per eigenvalue before giving up
const MAX_ITERATIONS: usize = 30;

#[inline]
fn at(i: isize, j: isize) -> [usize; 2] {
    [i as usize, j as usize]
}

/// Reduce `a` to upper Hessenberg form in place (entries below the first
/// sub-diagonal are set to zero).
pub(crate) fn hessenberg_in_place(a: &mut Array2<f64>) {
    let n = a.nrows();
    if n < 3 {
        return;
    }
    for m in 1..(n - 1) {
        let mut x = 0.0_f64;
        let mut pivot = m;
        for j in m..n {
            if a[[j, m - 1]].abs() > x.abs() {
                x = a[[j, m - 1]];
                pivot = j;
            }
        }
        if pivot != m {
            for j in (m - 1)..n {
                a.swap([pivot, j], [m, j]);
            }
            for j in 0..n {
                a.swap([j, pivot], [j, m]);
            }
        }
        if x == 0.0 {
            continue;
        }
        for i in (m + 1)..n {
            let mut y = a[[i, m - 1]];
            if y == 0.0 {
                continue;
            }
            y /= x;
            a[[i, m - 1]] = 0.0;
            for j in m..n {
                a[[i, j]] -= y * a[[m, j]];
            }
            for j in 0..n {
                a[[j, m]] += y * a[[j, i]];
            }
        }
    }
}

/// Eigenvalues of an upper Hessenberg matrix by the Francis double-shift QR iteration.
///
/// `a` is overwritten. Eigenvalues come out in deflation order, bottom of the matrix
/// first.
pub(crate) fn hessenberg_qr(a: &mut Array2<f64>) -> Result<Vec<Complex64>> {
    let mut values = Vec::with_capacity(a.nrows());
    let n = a.nrows() as isize;

    let mut anorm = 0.0_f64;
    for i in 0..n {
        for j in (i - 1).max(0)..n {
            anorm += a[at(i, j)].abs();
        }
    }

    let mut nn = n - 1;
    // accumulated exceptional shifts
    let mut t = 0.0_f64;
    while nn >= 0 {
        let mut its = 0;
        loop {
            // look for a single small sub-diagonal element
            let mut l = nn;
            while l >= 1 {
                let mut s = a[at(l - 1, l - 1)].abs() + a[at(l, l)].abs();
                if s == 0.0 {
                    s = anorm;
                }
                if a[at(l, l - 1)].abs() <= f64::EPSILON * s {
                    a[at(l, l - 1)] = 0.0;
                    break;
                }
                l -= 1;
            }

            let mut x = a[at(nn, nn)];
            if l == nn {
                values.push(Complex64::new(x + t, 0.0));
                nn -= 1;
                break;
            }

            let mut y = a[at(nn - 1, nn - 1)];
            let mut w = a[at(nn, nn - 1)] * a[at(nn - 1, nn)];
            if l == nn - 1 {
                let p = 0.5 * (y - x);
                let q = p * p + w;
                let mut z = q.abs().sqrt();
                x += t;
                if q >= 0.0 {
                    z = p + z.copysign(p);
                    let second = if z != 0.0 { x - w / z } else { x + z };
                    values.push(Complex64::new(second, 0.0));
                    values.push(Complex64::new(x + z, 0.0));
                } else {
                    values.push(Complex64::new(x + p, z));
                    values.push(Complex64::new(x + p, -z));
                }
                nn -= 2;
                break;
            }

            if its == MAX_ITERATIONS {
                return Err(SolverError::EigenNoConvergence { iterations: its });
            }
            if its == 10 || its == 20 {
                t += x;
                for i in 0..=nn {
                    a[at(i, i)] -= x;
                }
                let s = a[at(nn, nn - 1)].abs() + a[at(nn - 1, nn - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }
            its += 1;

            // look for two consecutive small sub-diagonal elements
            let (mut p, mut q, mut r, mut z): (f64, f64, f64, f64);
            let mut m = nn - 2;
            loop {
                z = a[at(m, m)];
                let rr = x - z;
                let ss = y - z;
                p = (rr * ss - w) / a[at(m + 1, m)] + a[at(m, m + 1)];
                q = a[at(m + 1, m + 1)] - z - rr - ss;
                r = a[at(m + 2, m + 1)];
                let s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                let u = a[at(m, m - 1)].abs() * (q.abs() + r.abs());
                let v = p.abs()
                    * (a[at(m - 1, m - 1)].abs() + z.abs() + a[at(m + 1, m + 1)].abs());
                if u <= f64::EPSILON * v {
                    break;
                }
                m -= 1;
            }

            for i in (m + 2)..=nn {
                a[at(i, i - 2)] = 0.0;
                if i != m + 2 {
                    a[at(i, i - 3)] = 0.0;
                }
            }

            // double QR step on rows l..=nn, columns m..=nn
            for k in m..nn {
                if k != m {
                    p = a[at(k, k - 1)];
                    q = a[at(k + 1, k - 1)];
                    r = if k != nn - 1 { a[at(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x != 0.0 {
                        p /= x;
                        q /= x;
                        r /= x;
                    }
                }
                let s = (p * p + q * q + r * r).sqrt().copysign(p);
                if s == 0.0 {
                    continue;
                }
                if k == m {
                    if l != m {
                        a[at(k, k - 1)] = -a[at(k, k - 1)];
                    }
                } else {
                    a[at(k, k - 1)] = -s * x;
                }
                p += s;
                x = p / s;
                y = q / s;
                z = r / s;
                q /= p;
                r /= p;
                for j in k..=nn {
                    let mut pj = a[at(k, j)] + q * a[at(k + 1, j)];
                    if k != nn - 1 {
                        pj += r * a[at(k + 2, j)];
                        a[at(k + 2, j)] -= pj * z;
                    }
                    a[at(k + 1, j)] -= pj * y;
                    a[at(k, j)] -= pj * x;
                }
                let mmin = nn.min(k + 3);
                for i in l..=mmin {
                    let mut pi = x * a[at(i, k)] + y * a[at(i, k + 1)];
                    if k != nn - 1 {
                        pi += z * a[at(i, k + 2)];
                        a[at(i, k + 2)] -= pi * r;
                    }
                    a[at(i, k + 1)] -= pi * q;
                    a[at(i, k)] -= pi;
                }
            }
        }
    }

    Ok(values)
}
