use std::fmt::Display;

use anyhow::Result;
use nalgebra::DMatrix;
use nalgebra_sparse::{coo::CooMatrix, csr::CsrMatrix};
use num_complex::Complex;

use crate::gates::{h_matrix, rx_matrix, ry_matrix, rz_matrix, x_matrix, y_matrix, z_matrix};
use crate::qstate::QState;
use crate::Qbit;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    RX(f64),
    RY(f64),
    RZ(f64),
}

impl GateKind {
    fn matrix(&self) -> CsrMatrix<Qbit> {
        match *self {
            GateKind::H => h_matrix(),
            GateKind::X => x_matrix(),
            GateKind::Y => y_matrix(),
            GateKind::Z => z_matrix(),
            GateKind::RX(angle) => rx_matrix(angle),
            GateKind::RY(angle) => ry_matrix(angle),
            GateKind::RZ(angle) => rz_matrix(angle),
        }
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateKind::H => write!(f, "H"),
            GateKind::X => write!(f, "X"),
            GateKind::Y => write!(f, "Y"),
            GateKind::Z => write!(f, "Z"),
            GateKind::RX(angle) => write!(f, "RX({})", angle),
            GateKind::RY(angle) => write!(f, "RY({})", angle),
            GateKind::RZ(angle) => write!(f, "RZ({})", angle),
        }
    }
}

/// A named gate given by its full-register matrix, with the most significant qubit first.
#[derive(Clone, Debug)]
pub struct CustomGate {
    name: String,
    matrix: DMatrix<Qbit>,
}

impl CustomGate {
    pub fn new(name: impl Into<String>, matrix: DMatrix<Qbit>) -> Result<Self> {
        let dim = matrix.nrows();
        if dim < 2 || dim != matrix.ncols() || (dim & (dim - 1)) != 0 {
            return Err(anyhow::anyhow!(
                "Custom gate matrix must be square with a power of 2 side, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            ));
        }

        Ok(Self {
            name: name.into(),
            matrix,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matrix(&self) -> &DMatrix<Qbit> {
        &self.matrix
    }

    pub fn num_of_qbits(&self) -> usize {
        self.matrix.nrows().ilog2() as usize
    }
}

#[derive(Clone, Debug)]
pub enum Instruction {
    Gate { kind: GateKind, qbit: usize },
    CNot { control: usize, target: usize },
    Custom(CustomGate),
    Measure { qbit: usize, bit: usize },
}

/// An ordered gate list over a fixed register, with an optional classical register.
#[derive(Clone, Debug)]
pub struct Circuit {
    instructions: Vec<Instruction>,
    num_of_qbits: usize,
    num_of_bits: usize,
}

impl Circuit {
    pub fn new(num_of_qbits: usize) -> Self {
        Self {
            instructions: Vec::new(),
            num_of_qbits,
            num_of_bits: 0,
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        self.num_of_qbits
    }

    pub fn num_of_bits(&self) -> usize {
        self.num_of_bits
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn check_and_revsere_index(&self, index: usize) -> Result<usize> {
        if index >= self.num_of_qbits {
            return Err(anyhow::anyhow!(
                "Index {} out of bounds for the number of qubits {}",
                index,
                self.num_of_qbits
            ));
        }
        Ok(self.num_of_qbits - 1 - index)
    }

    pub fn gate_at(mut self, index: usize, kind: GateKind) -> Result<Self> {
        self.add_gate_at(index, kind)?;
        Ok(self)
    }

    pub fn add_gate_at(&mut self, index: usize, kind: GateKind) -> Result<()> {
        self.check_and_revsere_index(index)?;
        self.instructions.push(Instruction::Gate { kind, qbit: index });
        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn H(self, index: usize) -> Result<Self> {
        self.gate_at(index, GateKind::H)
    }

    pub fn cnot(mut self, control: usize, target: usize) -> Result<Self> {
        self.add_cnot(control, target)?;
        Ok(self)
    }

    pub fn add_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_and_revsere_index(control)?;
        self.check_and_revsere_index(target)?;

        if control == target {
            return Err(anyhow::anyhow!(
                "Control and target qubits cannot be the same"
            ));
        }

        self.instructions
            .push(Instruction::CNot { control, target });
        Ok(())
    }

    /// Applies a user-defined gate across the whole register.
    pub fn add_custom_gate(&mut self, gate: &CustomGate) -> Result<()> {
        if gate.num_of_qbits() != self.num_of_qbits {
            return Err(anyhow::anyhow!(
                "Gate {} acts on {} qubits but the circuit has {}",
                gate.name(),
                gate.num_of_qbits(),
                self.num_of_qbits
            ));
        }

        self.instructions.push(Instruction::Custom(gate.clone()));
        Ok(())
    }

    /// Grows the classical register to at least `num_of_bits` bits.
    pub fn declare_bits(&mut self, num_of_bits: usize) {
        self.num_of_bits = self.num_of_bits.max(num_of_bits);
    }

    pub fn measure(&mut self, qbit: usize, bit: usize) -> Result<()> {
        self.check_and_revsere_index(qbit)?;
        if bit >= self.num_of_bits {
            return Err(anyhow::anyhow!(
                "Classical bit {} is not declared (register has {} bits)",
                bit,
                self.num_of_bits
            ));
        }

        self.instructions.push(Instruction::Measure { qbit, bit });
        Ok(())
    }

    /// `(qbit, bit)` pairs in program order.
    pub fn measurements(&self) -> Vec<(usize, usize)> {
        self.instructions
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Measure { qbit, bit } => Some((*qbit, *bit)),
                _ => None,
            })
            .collect()
    }

    fn create_gate_for_index(&self, index: usize, gate: &CsrMatrix<Qbit>) -> Result<CsrMatrix<Qbit>> {
        let index = self.check_and_revsere_index(index)?;

        let mut matrix = CsrMatrix::identity(1);
        for i in 0..self.num_of_qbits {
            if i == index {
                matrix = kronecker_product(&matrix, gate);
            } else {
                matrix = kronecker_product(&matrix, &CsrMatrix::identity(2));
            }
        }

        Ok(matrix)
    }

    fn build_control_matrix(
        &self,
        control: usize,
        target: usize,
        gate: &CsrMatrix<Qbit>,
    ) -> Result<CsrMatrix<Qbit>> {
        let control = self.check_and_revsere_index(control)?;
        let target = self.check_and_revsere_index(target)?;

        // |0><0|
        let mut zero_zero = CooMatrix::new(2, 2);
        zero_zero.push(0, 0, Complex::new(1.0, 0.0));
        let zero_zero = CsrMatrix::from(&zero_zero);

        // |1><1|
        let mut one_one = CooMatrix::new(2, 2);
        one_one.push(1, 1, Complex::new(1.0, 0.0));
        let one_one = CsrMatrix::from(&one_one);

        let id = CsrMatrix::identity(2);

        let mut zero_matrix = CsrMatrix::identity(1);
        let mut one_matrix = CsrMatrix::identity(1);
        for i in 0..self.num_of_qbits {
            if i == control {
                zero_matrix = kronecker_product(&zero_matrix, &zero_zero);
                one_matrix = kronecker_product(&one_matrix, &one_one);
            } else if i == target {
                zero_matrix = kronecker_product(&zero_matrix, &id);
                one_matrix = kronecker_product(&one_matrix, gate);
            } else {
                zero_matrix = kronecker_product(&zero_matrix, &id);
                one_matrix = kronecker_product(&one_matrix, &id);
            }
        }

        Ok(zero_matrix + one_matrix)
    }

    /// Evolves `state` through every gate. Measurements are ignored here; see [`crate::sampling`].
    pub fn apply(&self, state: &QState) -> Result<QState> {
        if state.num_of_qbits() != self.num_of_qbits {
            return Err(anyhow::anyhow!(
                "Circuit has {} qubits but the state has {}",
                self.num_of_qbits,
                state.num_of_qbits()
            ));
        }

        let mut result = state.state.clone();
        for inst in &self.instructions {
            match inst {
                Instruction::Gate { kind, qbit } => {
                    let matrix = self.create_gate_for_index(*qbit, &kind.matrix())?;
                    result = &matrix * result;
                }
                Instruction::CNot { control, target } => {
                    let matrix = self.build_control_matrix(*control, *target, &x_matrix())?;
                    result = &matrix * result;
                }
                Instruction::Custom(gate) => {
                    result = gate.matrix() * result;
                }
                Instruction::Measure { .. } => {}
            }
        }
        Ok(QState { state: result })
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.num_of_bits > 0 {
            writeln!(f, "DECLARE ro BIT[{}]", self.num_of_bits)?;
        }

        for inst in &self.instructions {
            match inst {
                Instruction::Gate { kind, qbit } => writeln!(f, "{} {}", kind, qbit)?,
                Instruction::CNot { control, target } => {
                    writeln!(f, "CNOT {} {}", control, target)?
                }
                Instruction::Custom(gate) => {
                    let qbits = (0..gate.num_of_qbits())
                        .rev()
                        .map(|q| q.to_string())
                        .collect::<Vec<_>>()
                        .join(" ");
                    writeln!(f, "{} {}", gate.name(), qbits)?
                }
                Instruction::Measure { qbit, bit } => writeln!(f, "MEASURE {} ro[{}]", qbit, bit)?,
            }
        }

        Ok(())
    }
}

pub fn kronecker_product(x: &CsrMatrix<Qbit>, y: &CsrMatrix<Qbit>) -> CsrMatrix<Qbit> {
    let mut result = CooMatrix::new(x.nrows() * y.nrows(), x.ncols() * y.ncols());

    for (rx, cx, value_x) in x.triplet_iter() {
        for (ry, cy, value_y) in y.triplet_iter() {
            let new_row = rx * y.nrows() + ry;
            let new_col = cx * y.ncols() + cy;
            let new_value = value_x * value_y;
            result.push(new_row, new_col, new_value);
        }
    }

    CsrMatrix::from(&result)
}
