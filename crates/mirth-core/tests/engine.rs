//! End-to-end scenarios exercising construction, views, aliasing,
//! elementwise arithmetic, and contraction together.

use mirth_core::prelude::*;
use mirth_core::AxisState::{Fixed, Free};

#[test]
fn construction_properties() {
    let t = Tensor::zeros(&[2, 3, 10]).unwrap();
    assert_eq!(t.size(), 60);
    assert_eq!(t.shape().dims(), &[2, 3, 10]);

    assert!(matches!(
        Tensor::zeros(&[0]),
        Err(MirthError::InvalidDimension { dim: 0 })
    ));
}

#[test]
fn index_coordinate_bijection() {
    let t = Tensor::zeros(&[3, 4, 5]).unwrap();
    for flat in 0..t.size() {
        let coords = t.to_coordinates(flat).unwrap();
        assert_eq!(t.to_index(&coords).unwrap(), flat);
    }
}

#[test]
fn copy_semantics() {
    let src = Tensor::from_nested(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

    let shallow = src.clone();
    let deep = src.deep_copy();
    src.set(&[0, 0], 100.0).unwrap();

    // Shallow copy aliases; deep copy is severed.
    assert_eq!(shallow.get(&[0, 0]).unwrap(), 100.0);
    assert_eq!(deep.get(&[0, 0]).unwrap(), 1.0);
}

#[test]
fn view_aliasing_chain() {
    // slice -> transpose -> set: mutation travels through the whole chain.
    let t = Tensor::zeros(&[2, 3, 4]).unwrap();
    let plane = t.slice(&[Fixed(1)]).unwrap();
    let flipped = plane.transpose();
    flipped.set(&[0, 0], 42.0).unwrap();
    assert_eq!(t.get(&[1, 0, 0]).unwrap(), 42.0);
}

#[test]
fn slice_reference_example() {
    let t = Tensor::from_nested(vec![
        vec![0.0, 1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0, 7.0],
        vec![8.0, 9.0, 10.0, 11.0],
    ])
    .unwrap();

    let col = t.slice(&[Free, Fixed(3)]).unwrap();
    assert_eq!(col.shape().dims(), &[3]);
    assert_eq!(col.strides(), &[4]);
    assert_eq!(col.offset(), 3);
    assert_eq!(col.flatten().to_vec(), vec![3.0, 7.0, 11.0]);
}

#[test]
fn transpose_reference_example() {
    let t = Tensor::from_nested(vec![
        vec![0.0, 1.0, 2.0, 3.0],
        vec![4.0, 5.0, 6.0, 7.0],
        vec![8.0, 9.0, 10.0, 11.0],
    ])
    .unwrap();

    let tr = t.transpose();
    assert_eq!(tr.shape().dims(), &[4, 3]);
    assert_eq!(tr.get(&[0, 1]).unwrap(), 4.0);
    assert_eq!(t.get(&[0, 1]).unwrap(), 1.0);
}

#[test]
fn reshape_rules() {
    let t = Tensor::zeros(&[2, 3, 1]).unwrap();
    let r = t.reshape(&[3, 2]).unwrap();
    assert_eq!(r.shape().dims(), &[3, 2]);
    assert_eq!(t.shape().dims(), &[2, 3, 1]);

    let t = Tensor::zeros(&[2, 3]).unwrap();
    assert_eq!(t.reshape(&[3, -1]).unwrap().shape().dims(), &[3, 2]);

    assert_eq!(
        t.reshape(&[-1, -1]).unwrap_err(),
        MirthError::MultipleInferredDimensions
    );
    assert!(matches!(
        t.reshape(&[4, 4]),
        Err(MirthError::SizeMismatch { .. })
    ));
    assert_eq!(
        t.transpose().reshape(&[6]).unwrap_err(),
        MirthError::NotContiguous
    );
}

#[test]
fn arithmetic_is_pure() {
    let a = Tensor::from_nested(vec![1.0, 2.0, 3.0]).unwrap();
    let b = Tensor::from_nested(vec![10.0, 20.0, 30.0]).unwrap();

    let sum = a.add(&b).unwrap();
    let diff = a.sub(&b).unwrap();
    assert_eq!(sum.to_vec(), vec![11.0, 22.0, 33.0]);
    assert_eq!(diff.to_vec(), vec![-9.0, -18.0, -27.0]);
    assert_eq!(a.to_vec(), vec![1.0, 2.0, 3.0]);
    assert_eq!(b.to_vec(), vec![10.0, 20.0, 30.0]);
}

#[test]
fn dot_reference_examples() {
    let v1 = Tensor::from_nested(vec![1.0, 2.0, 3.0]).unwrap();
    let v2 = Tensor::from_nested(vec![3.0, 2.0, 1.0]).unwrap();
    let m = Tensor::from_nested(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]).unwrap();
    let m2 = Tensor::from_nested(vec![vec![2.0, 1.0], vec![2.0, 1.0], vec![2.0, 1.0]]).unwrap();
    let cube = Tensor::from_nested(vec![
        vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        vec![vec![5.0, 6.0], vec![7.0, 8.0]],
    ])
    .unwrap();
    let pair = Tensor::from_nested(vec![1.0, 2.0]).unwrap();

    let c = v1.dot(&v2).unwrap();
    assert_eq!((c.shape().dims(), c.to_vec()), (&[1][..], vec![10.0]));

    let c = m.dot(&v2).unwrap();
    assert_eq!((c.shape().dims(), c.to_vec()), (&[2][..], vec![10.0, 10.0]));

    let c = m.dot(&m2).unwrap();
    assert_eq!(
        (c.shape().dims(), c.to_vec()),
        (&[2, 2][..], vec![12.0, 6.0, 12.0, 6.0])
    );

    let c = cube.dot(&pair).unwrap();
    assert_eq!(
        (c.shape().dims(), c.to_vec()),
        (&[2, 2][..], vec![5.0, 11.0, 17.0, 23.0])
    );

    let c = pair.dot(&cube).unwrap();
    assert_eq!(
        (c.shape().dims(), c.to_vec()),
        (&[2, 2][..], vec![7.0, 10.0, 19.0, 22.0])
    );
}

#[test]
fn display_reference_format() {
    let t = Tensor::zeros(&[2, 2, 2]).unwrap();
    assert_eq!(t.to_string(), "[[[0, 0],\n  [0, 0]],\n [[0, 0],\n  [0, 0]]]");

    // Views print their own element order.
    let m = Tensor::from_nested(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    assert_eq!(m.to_string(), "[[1, 2],\n [3, 4]]");
    assert_eq!(m.transpose().to_string(), "[[1, 3],\n [2, 4]]");
}

#[test]
fn flatten_feeds_external_consumers_in_row_major_order() {
    // The plotting collaborator receives flattened x/y sequences; the only
    // contract is row-major value order.
    let xs = Tensor::arange(0.0, 4.0, 1.0);
    let ys = xs.map(|x| x * x);
    assert_eq!(xs.flatten().to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(ys.flatten().to_vec(), vec![0.0, 1.0, 4.0, 9.0]);
}
