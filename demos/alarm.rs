//! Provides an example of exact and approximate inference on the burglary network, loaded from the
//! XMLBIF file next to this one.

use bnquery as bn;
use bn::ConditionalInferenceEngine;

fn main() -> bn::Result<()> {
    let model = bn::xmlbif::parse_str(include_str!("alarm.xml"))?;

    println!("Topological order: {:?}", model.topological_order());

    ////////////////////////////////////////////////////////////////////////////
    // Step 1:  Exact posterior of a burglary given that both neighbours call
    let evidence = bn::Evidence::parse(&["JohnCalls=t", "MaryCalls=t"])?;
    let exact = bn::EnumerationEngine::new(&model).infer("Burglary", &evidence)?;
    println!("{}", exact);

    ////////////////////////////////////////////////////////////////////////////
    // Step 2:  The same query by rejection sampling, at increasing sample counts
    //
    // Note:    the evidence has prior probability of about 0.002, so nearly all
    //          samples are rejected
    println!("   Samples | P(Burglary=t) | Error");
    println!("-----------------------------------------");
    for &n in &[1_000usize, 10_000, 100_000, 1_000_000] {
        let mut engine = bn::RejectionSamplingEngine::new(&model, n, 42)?;
        match engine.infer("Burglary", &evidence) {
            Ok(approx) => {
                let p = approx.get("t").unwrap_or(0.0);
                println!("{:>10} | {:>13.6} | {:.6}", n, p, exact.max_abs_diff(&approx));
            },
            Err(bn::InferenceError::ZeroProbabilityEvidence) => {
                println!("{:>10} | no sample agreed with the evidence", n);
            },
            Err(e) => return Err(e)
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // Step 3:  Probability of one complete world
    let world = bn::Assignment::parse(&[
        "Burglary=f", "Earthquake=f", "Alarm=t", "JohnCalls=t", "MaryCalls=t"
    ])?;
    println!("\nP({}) = {:.8}", world, model.joint_probability(&world)?);

    Ok(())
}
