//! GLSL shaders compiled to SPIR-V at build time.

pub mod simple {
	pub mod vertex {
		vulkano_shaders::shader!{
			ty: "vertex",
			path: "shaders/simple.vert",
		}

		// force recompilation on changes in shader source
		const _: &[u8] = include_bytes!("../../shaders/simple.vert");
	}
	pub mod fragment {
		vulkano_shaders::shader!{
			ty: "fragment",
			path: "shaders/simple.frag",
		}

		// force recompilation on changes in shader source
		const _: &[u8] = include_bytes!("../../shaders/simple.frag");
	}
}
