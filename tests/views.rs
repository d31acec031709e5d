use approx::assert_abs_diff_eq;
use strided_linsolve::ops::{mat_add, matmul, transform, transpose, vec_add, vec_scale};
use strided_linsolve::{
    BlockTridiagonal, CaptureReporter, Linalg, LinalgError, Matrix, MatrixMut, MatrixRef,
    Severity, StridedVec, StridedVecMut, Tridiagonal, Vector,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn make_matrix(rows: usize, cols: usize) -> Matrix<f64> {
    Matrix::from_fn(rows, cols, |r, c| (r * cols + c) as f64).unwrap()
}

#[test]
fn test_row_col_get_agree() {
    let m = make_matrix(4, 5);
    for r in 0..4 {
        let row = m.row(r).unwrap();
        assert_eq!(row.stride(), 1);
        for c in 0..5 {
            let col = m.col(c).unwrap();
            assert_eq!(col.stride(), 5);
            let v = m.get(r, c).unwrap();
            assert_eq!(row.get(c).unwrap(), v);
            assert_eq!(col.get(r).unwrap(), v);
        }
    }
}

#[test]
fn test_views_over_caller_storage() {
    let mut data = vec![0.0; 6];
    {
        let mut m = MatrixMut::new(&mut data, 2, 3).unwrap();
        m.col_mut(1).unwrap().fill(7.0);
        m.row_mut(1).unwrap().set(2, 9.0).unwrap();
    }
    assert_eq!(data, [0.0, 7.0, 0.0, 0.0, 7.0, 9.0]);

    let r = MatrixRef::new(&data, 3, 2).unwrap();
    assert_eq!(r.row(2).unwrap().to_vec(), vec![7.0, 9.0]);
    assert!(matches!(
        MatrixRef::new(&data, 4, 2),
        Err(LinalgError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        MatrixRef::new(&data, 0, 2),
        Err(LinalgError::ZeroDimension { .. })
    ));
}

#[test]
fn test_strided_view_bounds() {
    let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let v = StridedVec::new(&data, 1, 3, 2).unwrap();
    assert_eq!(v.to_vec(), vec![2.0, 4.0, 6.0]);
    assert_eq!(
        v.get(3).unwrap_err(),
        LinalgError::OutOfBounds { index: 3, len: 3 }
    );
    assert!(StridedVec::new(&data, 2, 3, 2).is_err());
    assert!(StridedVec::new(&data, 0, 2, 0).is_err());
}

#[test]
fn test_free_twice_everywhere() {
    let mut v = Vector::<f64>::ones(3).unwrap();
    let mut m = Matrix::<f64>::ones(2, 2).unwrap();
    let mut t = Tridiagonal::filled(1.0, 3).unwrap();
    let mut b = BlockTridiagonal::<f64>::zeros(2).unwrap();
    for _ in 0..2 {
        v.free();
        m.free();
        t.free();
        b.free();
        assert_eq!(v.len(), 0);
        assert_eq!((m.rows(), m.cols()), (0, 0));
        assert_eq!(t.len(), 0);
        assert_eq!(b.len(), 0);
    }
}

#[test]
fn test_shape_violations_leave_output_untouched() {
    let a = make_matrix(2, 3);
    let b = make_matrix(3, 2);
    let x = Vector::<f64>::ones(3).unwrap();

    let mut out = Matrix::filled(-1.0, 2, 2).unwrap();
    assert!(mat_add(&a.view(), &b.view(), &mut out.view_mut()).is_err());
    assert!(transpose(&a.view(), &mut out.view_mut()).is_err());
    assert!(matmul(&a.view(), &a.view(), &mut out.view_mut()).is_err());
    assert!(out.as_slice().iter().all(|&v| v == -1.0));

    let mut y = Vector::filled(-1.0, 3).unwrap();
    assert!(transform(&a.view(), &x.view(), &mut y.view_mut()).is_err());
    assert_eq!(y.as_slice(), &[-1.0, -1.0, -1.0]);
    vec_add(&x.view(), &a.row(1).unwrap(), &mut y.view_mut()).unwrap();
    assert_eq!(y.as_slice(), &[4.0, 5.0, 6.0]);

    let mut short = Vector::filled(-1.0, 2).unwrap();
    assert!(vec_scale(2.0, &x.view(), &mut short.view_mut()).is_err());
    assert_eq!(short.as_slice(), &[-1.0, -1.0]);
}

#[test]
fn test_column_arithmetic_writes_only_that_column() {
    let mut m = make_matrix(3, 3);
    let src = m.col(0).unwrap().to_vec();
    vec_scale(
        10.0,
        &StridedVec::contiguous(&src),
        &mut m.col_mut(2).unwrap(),
    )
    .unwrap();
    assert_eq!(m.col(2).unwrap().to_vec(), vec![0.0, 30.0, 60.0]);
    assert_eq!(m.col(1).unwrap().to_vec(), vec![1.0, 4.0, 7.0]);
}

#[test]
fn test_display() {
    let v = Vector::from_vec(vec![1.0, 2.5]).unwrap();
    assert_eq!(v.to_string(), "[1e0, 2.5e0]");
    let m = Matrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    assert_eq!(m.to_string(), "[\n  [1e0, 2e0],\n  [3e0, 4e0]\n]");
}

#[test]
fn test_context_routes_through_tracing_and_capture() {
    let _guard = tracing_subscriber::registry()
        .with(EnvFilter::new("debug"))
        .with(fmt::layer().with_test_writer())
        .set_default();

    // Default reporter logs through the installed subscriber.
    let la = Linalg::new();
    let empty: [f64; 0] = [];
    let res = la.check(
        "max",
        strided_linsolve::ops::max(&StridedVec::contiguous(&empty)),
    );
    assert_eq!(res.unwrap_err(), LinalgError::Empty { op: "max" });

    let capture = CaptureReporter::new();
    let la = Linalg::with_reporter(&capture);
    let data = [1.0, 2.0];
    let _ = la.check("get", StridedVec::contiguous(&data).get(5));
    let mut out = [0.0; 2];
    let _ = la.check(
        "copy_from",
        StridedVecMut::contiguous(&mut out).copy_from(&StridedVec::contiguous(&[1.0])),
    );
    let res = la.check("max", strided_linsolve::ops::max(&StridedVec::contiguous(&empty)));
    assert!(res.is_err());

    let diags = capture.diagnostics();
    assert_eq!(diags.len(), 3);
    assert_eq!(diags[0].message, "index 5 out of bounds for length 2");
    assert_eq!(diags[1].severity, Severity::Error);
    assert_eq!(diags[2].severity, Severity::Warning);
    assert_abs_diff_eq!(out[0], 0.0);
}
