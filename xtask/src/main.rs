use glam::{DVec2, dvec2};
use texanchor::{Angle, PlaceAlignment, PlacedGeometry, Pose, Quad, Tolerance};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "boundary" => boundary(&args[2..]),
        "reference" => {
            print_boundary(Pose::new(dvec2(150.0, -300.0), PlaceAlignment::MidMid), dvec2(76.07, 16.99))
        }
        _ => Err(format!("Unknown command: {}", args[1])),
    };

    if let Err(message) = result {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn usage() {
    eprintln!("Usage: cargo xtask <command>");
    eprintln!("Commands:");
    eprintln!("  boundary W H X Y [DEG [SX SY]]  Print the nine boundary points of content");
    eprintln!("                                  W x H centred at (X, Y), rotated by DEG and");
    eprintln!("                                  stretched by SX, SY");
    eprintln!("  reference                       Print the boundary of the reference item");
}

fn boundary(args: &[String]) -> Result<(), String> {
    let values = args
        .iter()
        .map(|a| a.parse::<f64>().map_err(|_| format!("Not a number: {a}")))
        .collect::<Result<Vec<_>, _>>()?;

    let (content, anchor, rest) = match values.as_slice() {
        [w, h, x, y, rest @ ..] => (dvec2(*w, *h), dvec2(*x, *y), rest),
        _ => return Err("boundary needs at least W H X Y".to_string()),
    };
    let mut pose = Pose::new(anchor, PlaceAlignment::MidMid);
    match rest {
        [] => {}
        [deg] => pose = pose.with_angle(Angle::from_degrees(*deg)),
        [deg, sx, sy] => {
            pose = pose
                .with_angle(Angle::from_degrees(*deg))
                .with_stretch(dvec2(*sx, *sy))
        }
        _ => return Err("boundary takes W H X Y [DEG [SX SY]]".to_string()),
    }
    print_boundary(pose, content)
}

fn print_boundary(pose: Pose, content: DVec2) -> Result<(), String> {
    let geometry = PlacedGeometry::new(Quad::from_pose(&pose, content), content, Tolerance::default())
        .map_err(|e| e.to_string())?;

    println!(
        "angle {:.3}°  stretch {:.4} x {:.4}  rotated={} stretched={} diamond={}",
        pose.angle.degrees(),
        pose.stretch.x,
        pose.stretch.y,
        geometry.is_rotated(),
        geometry.is_stretched(),
        geometry.is_diamond()
    );
    for (alignment, point) in geometry.boundary().iter() {
        println!("{:<9} {:>10.3} {:>10.3}", alignment.to_string(), point.x, point.y);
    }
    Ok(())
}
