use nalgebra::{Matrix2, Matrix4};
use nalgebra_sparse::convert::serial::convert_dense_coo;
use nalgebra_sparse::{coo::CooMatrix, csr::CsrMatrix};
use num_complex::Complex;

use crate::Qbit;

fn to_sparse(dense: &Matrix2<Qbit>) -> CsrMatrix<Qbit> {
    CsrMatrix::from(&convert_dense_coo(dense))
}

pub fn i_dense_matrix() -> Matrix2<Qbit> {
    Matrix2::identity()
}

pub fn x_dense_matrix() -> Matrix2<Qbit> {
    let one = Complex::new(1.0, 0.0);
    Matrix2::from_row_slice(&[Complex::ZERO, one, one, Complex::ZERO])
}

pub fn y_dense_matrix() -> Matrix2<Qbit> {
    let i = Complex::new(0.0, 1.0);
    Matrix2::from_row_slice(&[Complex::ZERO, -i, i, Complex::ZERO])
}

pub fn z_dense_matrix() -> Matrix2<Qbit> {
    let one = Complex::new(1.0, 0.0);
    Matrix2::from_row_slice(&[one, Complex::ZERO, Complex::ZERO, -one])
}

pub fn h_dense_matrix() -> Matrix2<Qbit> {
    let root2 = 2.0_f64.sqrt();
    let one = Complex::new(1.0, 0.0);
    Matrix2::from_row_slice(&[one / root2, one / root2, one / root2, -one / root2])
}

/// CNOT with the most significant qubit as control, in `|q1 q0>` ordering.
pub fn cx_dense_matrix() -> Matrix4<Qbit> {
    let one = Complex::new(1.0, 0.0);
    let mut cx = Matrix4::zeros();
    cx[(0, 0)] = one;
    cx[(1, 1)] = one;
    cx[(2, 3)] = one;
    cx[(3, 2)] = one;
    cx
}

pub fn h_matrix() -> CsrMatrix<Qbit> {
    to_sparse(&h_dense_matrix())
}

pub fn x_matrix() -> CsrMatrix<Qbit> {
    let mut x_coo = CooMatrix::new(2, 2);
    x_coo.push(0, 1, Complex::new(1.0, 0.0));
    x_coo.push(1, 0, Complex::new(1.0, 0.0));
    CsrMatrix::from(&x_coo)
}

pub fn y_matrix() -> CsrMatrix<Qbit> {
    let mut y_coo = CooMatrix::new(2, 2);
    y_coo.push(0, 1, Complex::new(0.0, -1.0));
    y_coo.push(1, 0, Complex::new(0.0, 1.0));
    CsrMatrix::from(&y_coo)
}

pub fn z_matrix() -> CsrMatrix<Qbit> {
    let mut z_coo = CooMatrix::new(2, 2);
    z_coo.push(0, 0, Complex::new(1.0, 0.0));
    z_coo.push(1, 1, Complex::new(-1.0, 0.0));
    CsrMatrix::from(&z_coo)
}

pub fn rx_matrix(angle: f64) -> CsrMatrix<Qbit> {
    let cos = Complex::new((angle / 2.0).cos(), 0.0);
    let isin = Complex::new(0.0, -(angle / 2.0).sin());
    to_sparse(&Matrix2::from_row_slice(&[cos, isin, isin, cos]))
}

pub fn ry_matrix(angle: f64) -> CsrMatrix<Qbit> {
    let cos = Complex::new((angle / 2.0).cos(), 0.0);
    let sin = Complex::new((angle / 2.0).sin(), 0.0);
    to_sparse(&Matrix2::from_row_slice(&[cos, -sin, sin, cos]))
}

pub fn rz_matrix(angle: f64) -> CsrMatrix<Qbit> {
    let mut rz_coo = CooMatrix::new(2, 2);
    rz_coo.push(0, 0, Complex::from_polar(1.0, -angle / 2.0));
    rz_coo.push(1, 1, Complex::from_polar(1.0, angle / 2.0));
    CsrMatrix::from(&rz_coo)
}
