use cobalt_nn::{train_epoch, Network, NetworkSnapshot};

fn main() {
    let mut network = Network::new(2, 4, 1);

    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    let targets = vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]];

    let epochs = 5000;
    for epoch in 0..epochs {
        let loss = train_epoch(&mut network, &inputs, &targets)
            .expect("dataset matches the 2-4-1 topology");
        if epoch % 500 == 0 {
            println!("Epoch {epoch}: loss = {loss:.6}");
        }
    }

    for input in &inputs {
        let output = network.predict(input).expect("input matches topology");
        println!("Input: {:?} -> Output: {:.4}", input, output[0]);
    }

    // Checkpoint the trained state; a reloaded snapshot predicts identically.
    let snapshot = network.serialize();
    snapshot
        .save_json("xor_model.json")
        .expect("write xor_model.json");
    let restored = Network::from_snapshot(
        NetworkSnapshot::load_json("xor_model.json").expect("read xor_model.json"),
    );
    assert_eq!(restored.predict(&inputs[1]), network.predict(&inputs[1]));
    println!("Saved and reloaded snapshot at xor_model.json");
}
