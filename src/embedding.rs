use ndarray::{Array1, Array2};

const EPS: f64 = 1e-12;
const POWER_ITERS: usize = 200;
const POWER_TOL: f64 = 1e-10;

/// Column-wise standardization to zero mean and unit variance, using the
/// population standard deviation (ddof = 0). A constant column maps to
/// all zeros instead of dividing by zero.
pub fn standardize(data: &Array2<f64>) -> Array2<f64> {
    let n = data.nrows() as f64;
    let mut out = data.clone();
    for mut col in out.columns_mut() {
        let mean = col.sum() / n;
        let var = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = var.sqrt();
        if std <= EPS {
            col.fill(0.0);
        } else {
            col.mapv_inplace(|v| (v - mean) / std);
        }
    }
    out
}

/// Project already-centered rows onto their two directions of maximal
/// variance. Returns an (n x 2) score matrix. With a single input
/// feature the second coordinate is identically zero.
pub fn project_2d(centered: &Array2<f64>) -> Array2<f64> {
    let (n, d) = centered.dim();
    let mut scores = Array2::zeros((n, 2));
    if n == 0 || d == 0 {
        return scores;
    }
    if d == 1 {
        scores.column_mut(0).assign(&centered.column(0));
        return scores;
    }

    // Sample covariance; the absolute scale cancels in the distance
    // ranking, only the eigenvector directions matter.
    let cov = centered.t().dot(centered) / ((n as f64 - 1.0).max(1.0));

    let mut deflated = cov;
    for k in 0..2 {
        let (eigenvalue, axis) = power_iteration(&deflated);
        if eigenvalue <= EPS {
            break;
        }
        let component = centered.dot(&axis);
        scores.column_mut(k).assign(&component);
        // Deflate: A -= lambda * v * v^T.
        for i in 0..d {
            for j in 0..d {
                deflated[[i, j]] -= eigenvalue * axis[i] * axis[j];
            }
        }
    }
    scores
}

/// Dominant eigenpair of a symmetric matrix by power iteration. The
/// start vector carries a small index-dependent tilt so it is never
/// orthogonal to the dominant eigenvector of a symmetric layout.
fn power_iteration(matrix: &Array2<f64>) -> (f64, Array1<f64>) {
    let d = matrix.nrows();
    let mut v = Array1::from_iter((0..d).map(|i| 1.0 + 0.001 * i as f64));
    normalize(&mut v);

    let mut eigenvalue = 0.0;
    for _ in 0..POWER_ITERS {
        let mut next = matrix.dot(&v);
        let next_eigenvalue = v.dot(&next);
        let norm = next.dot(&next).sqrt();
        if norm <= EPS {
            return (0.0, v);
        }
        next /= norm;
        let converged = (next_eigenvalue - eigenvalue).abs() < POWER_TOL;
        eigenvalue = next_eigenvalue;
        v = next;
        if converged {
            break;
        }
    }
    (eigenvalue, v)
}

fn normalize(v: &mut Array1<f64>) {
    let norm = v.dot(&*v).sqrt();
    if norm > EPS {
        *v /= norm;
    }
}
