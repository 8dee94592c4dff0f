//! Miscellaneous helper macros for output handling.

pub use ndarray_npy::NpzWriter;

/// Create a directory and all missing parents, aborting with a message on
/// failure.
#[macro_export]
macro_rules! mkdir {
    ( $dir:expr ) => {
        if let Err(err) = std::fs::create_dir_all(&$dir) {
            eprintln!("couldn't create directory {:?}: {}", $dir, err);
            std::process::exit(1);
        }
    }
}

/// Write a series of named arrays to a `.npz` archive, aborting with a
/// message on failure.
#[macro_export]
macro_rules! write_npz {
    (
        $path:expr,
        arrays: { $( $name:expr => $arr:expr ),+ $(,)? }
    ) => {
        if let Err(err) = (|| -> Result<(), Box<dyn std::error::Error>> {
            let mut npz
                = $crate::utils::NpzWriter::new(std::fs::File::create(&$path)?);
            $( npz.add_array($name, $arr)?; )+
            npz.finish()?;
            Ok(())
        })() {
            eprintln!("couldn't write {:?}: {}", $path, err);
            std::process::exit(1);
        }
    }
}
